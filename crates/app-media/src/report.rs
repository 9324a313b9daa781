use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use crate::{error::ToolError, job::JobKind};

/// How one item of a batch went.
#[derive(Debug)]
pub struct ItemOutcome {
    /// Scene name or clip index, whatever identifies the item to a person.
    pub label: String,
    pub output: PathBuf,
    pub result: Result<(), ToolError>,
}

impl ItemOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item results of a best-effort job. Failed items never stop the batch;
/// they end up here instead.
#[derive(Debug)]
pub struct BatchReport {
    job: JobKind,
    outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    #[must_use]
    pub const fn new(job: JobKind) -> Self {
        Self {
            job,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record<S: Into<String>>(
        &mut self,
        label: S,
        output: &Path,
        result: Result<(), ToolError>,
    ) {
        self.outcomes.push(ItemOutcome {
            label: label.into(),
            output: output.to_path_buf(),
            result,
        });
    }

    #[must_use]
    pub const fn job(&self) -> JobKind {
        self.job
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|x| x.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// `true` when nothing failed, including when there was nothing to do.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|x| !x.is_success())
    }
}

impl Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{job}: {ok} succeeded, {failed} failed",
            job = self.job,
            ok = self.succeeded(),
            failed = self.failed()
        )?;

        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(()) => write!(
                    f,
                    "\n  ok    {label} -> {output}",
                    label = outcome.label,
                    output = outcome.output.display()
                )?,
                Err(e) => write!(f, "\n  FAIL  {label}: {e}", label = outcome.label)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> ToolError {
        ToolError::Exited {
            job: JobKind::Thumbnail,
            code: Some(1),
            stderr: String::new(),
        }
    }

    #[test]
    fn tallies() {
        let mut report = BatchReport::new(JobKind::Thumbnail);
        report.record("scene_01", Path::new("t/scene_01.jpg"), Ok(()));
        report.record("scene_02", Path::new("t/scene_02.jpg"), Err(failure()));
        report.record("scene_03", Path::new("t/scene_03.jpg"), Ok(()));

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_clean());
        assert_eq!(
            report.failures().map(|x| x.label.as_str()).collect::<Vec<_>>(),
            vec!["scene_02"]
        );
    }

    #[test]
    fn empty_report_is_clean() {
        let report = BatchReport::new(JobKind::Clip);

        assert!(report.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "clip: 0 succeeded, 0 failed");
    }

    #[test]
    fn summary_names_every_item() {
        let mut report = BatchReport::new(JobKind::Thumbnail);
        report.record("scene_01", Path::new("t/scene_01.jpg"), Ok(()));
        report.record("scene_02", Path::new("t/scene_02.jpg"), Err(failure()));

        assert_eq!(
            report.to_string(),
            "thumbnail: 1 succeeded, 1 failed\n  \
             ok    scene_01 -> t/scene_01.jpg\n  \
             FAIL  scene_02: thumbnail failed: transcoder exited with code 1"
        );
    }
}
