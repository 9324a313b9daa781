use std::{path::PathBuf, process};

use app_helpers::process::{command_line, run_captured};
use log::{debug, info, trace, warn};

use crate::{error::ToolError, job::JobSpec};

/// How many stderr lines of a failed invocation are kept for the report.
const STDERR_TAIL_LINES: usize = 5;

/// Something that can carry out a [`JobSpec`]. Every call blocks until the job is done.
pub trait Transcoder {
    fn run(&self, job: &JobSpec) -> Result<(), ToolError>;

    /// Whether a successful [`Self::run`] leaves the job's output on disk.
    ///
    /// When it doesn't, later jobs can't expect earlier outputs to exist.
    fn writes_outputs(&self) -> bool {
        true
    }
}

impl<T: Transcoder + ?Sized> Transcoder for Box<T> {
    fn run(&self, job: &JobSpec) -> Result<(), ToolError> {
        (**self).run(job)
    }

    fn writes_outputs(&self) -> bool {
        (**self).writes_outputs()
    }
}

impl<T: Transcoder + ?Sized> Transcoder for &T {
    fn run(&self, job: &JobSpec) -> Result<(), ToolError> {
        (**self).run(job)
    }

    fn writes_outputs(&self) -> bool {
        (**self).writes_outputs()
    }
}

/// Runs jobs through an `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn command(&self, job: &JobSpec) -> process::Command {
        let mut cmd = process::Command::new(&self.program);
        cmd.args(job.args());
        cmd
    }
}

impl Transcoder for Ffmpeg {
    fn run(&self, job: &JobSpec) -> Result<(), ToolError> {
        let mut cmd = self.command(job);
        info!("Running `ffmpeg' command: {}", command_line(&cmd));

        let output = run_captured(&mut cmd).map_err(|error| ToolError::Launch {
            job: job.kind(),
            program: self.program.clone(),
            error,
        })?;

        if output.success() {
            trace!("`ffmpeg' stderr: {stderr:?}", stderr = output.stderr);
            debug!("Wrote {path:?}", path = job.output());
            return Ok(());
        }

        let stderr = output.stderr_tail(STDERR_TAIL_LINES);
        warn!(
            "`ffmpeg' failed writing {path:?} ({status}): {stderr}",
            path = job.output(),
            status = output.status,
        );

        Err(ToolError::Exited {
            job: job.kind(),
            code: output.code(),
            stderr,
        })
    }
}

/// Logs what [`Ffmpeg`] would run and reports success.
#[derive(Debug, Clone)]
pub struct DryRun {
    ffmpeg: Ffmpeg,
}

impl DryRun {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            ffmpeg: Ffmpeg::new(program),
        }
    }
}

impl Transcoder for DryRun {
    fn run(&self, job: &JobSpec) -> Result<(), ToolError> {
        info!(
            "[dry run] Would run: {}",
            command_line(&self.ffmpeg.command(job))
        );

        Ok(())
    }

    fn writes_outputs(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use assert_matches::assert_matches;

    use super::*;
    use crate::job::JobKind;

    fn thumbnail_job(dir: &Path) -> JobSpec {
        JobSpec::Thumbnail {
            input: dir.join("scene.mp4"),
            seek: "00:00:01".into(),
            output: dir.join("scene.jpg"),
        }
    }

    #[test]
    fn command_is_program_plus_job_args() {
        let ffmpeg = Ffmpeg::new("/usr/bin/ffmpeg");
        let job = thumbnail_job(Path::new("/tmp"));

        let cmd = ffmpeg.command(&job);

        assert_eq!(cmd.get_program(), "/usr/bin/ffmpeg");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), job.args());
    }

    #[test]
    fn missing_binary_is_a_launch_error() {
        let tmp = tempfile::tempdir().unwrap();
        let ffmpeg = Ffmpeg::new(tmp.path().join("no-ffmpeg-here"));

        let res = ffmpeg.run(&thumbnail_job(tmp.path()));

        assert_matches!(
            res,
            Err(ToolError::Launch {
                job: JobKind::Thumbnail,
                ..
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_exited_error() {
        let tmp = tempfile::tempdir().unwrap();

        let res = Ffmpeg::new("false").run(&thumbnail_job(tmp.path()));

        let err = res.unwrap_err();
        assert_eq!(err.job(), JobKind::Thumbnail);
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(err.stderr(), None);
    }

    #[test]
    fn dry_run_never_fails() {
        let dry_run = DryRun::new("/definitely/not/ffmpeg");

        assert!(dry_run.run(&thumbnail_job(Path::new("/tmp"))).is_ok());
    }

    #[test]
    fn only_ffmpeg_writes_outputs() {
        let boxed: Box<dyn Transcoder> = Box::new(DryRun::new("ffmpeg"));

        assert!(Ffmpeg::new("ffmpeg").writes_outputs());
        assert!(!DryRun::new("ffmpeg").writes_outputs());
        assert!(!boxed.writes_outputs());
    }
}
