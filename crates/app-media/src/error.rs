use std::{io, path::PathBuf};

use crate::job::JobKind;

/// Anything that stops a job as a whole.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No scene files with extension `.{extension}` found in {dir:?}")]
    NoInput { dir: PathBuf, extension: String },

    #[error("Source video {0:?} does not exist")]
    MissingSource(PathBuf),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl BatchError {
    pub(crate) fn io<S: Into<String>>(context: S) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// A single transcoder invocation that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{job} failed: transcoder {}", describe_exit(.code))]
    Exited {
        job: JobKind,
        /// `None` when the process was killed by a signal.
        code: Option<i32>,
        /// The tail of what the transcoder printed to stderr.
        stderr: String,
    },

    /// Carries the spawn error in its message rather than as a source, so a
    /// per-item report line is complete on its own.
    #[error("{job} failed: could not run {program:?}: {error}")]
    Launch {
        job: JobKind,
        program: PathBuf,
        error: io::Error,
    },
}

impl ToolError {
    #[must_use]
    pub const fn job(&self) -> JobKind {
        match self {
            Self::Exited { job, .. } | Self::Launch { job, .. } => *job,
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exited { code, .. } => *code,
            Self::Launch { .. } => None,
        }
    }

    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Exited { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "was terminated by a signal".to_string(),
        |code| format!("exited with code {code}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_messages() {
        let exited = ToolError::Exited {
            job: JobKind::Concat,
            code: Some(1),
            stderr: String::new(),
        };
        let killed = ToolError::Exited {
            job: JobKind::Clip,
            code: None,
            stderr: "Killed".to_string(),
        };

        assert_eq!(exited.to_string(), "concat failed: transcoder exited with code 1");
        assert_eq!(exited.stderr(), None);
        assert_eq!(killed.to_string(), "clip failed: transcoder was terminated by a signal");
        assert_eq!(killed.stderr(), Some("Killed"));
    }

    #[test]
    fn tool_errors_pass_through_batch_errors() {
        let err: BatchError = ToolError::Exited {
            job: JobKind::Concat,
            code: Some(183),
            stderr: String::new(),
        }
        .into();

        assert_eq!(err.to_string(), "concat failed: transcoder exited with code 183");
    }

    #[test]
    fn io_errors_keep_their_cause_as_source() {
        use std::error::Error;

        let err = BatchError::io("Failed to read scene directory \"media\"")(io::Error::new(
            io::ErrorKind::NotFound,
            "No such file or directory",
        ));

        assert_eq!(err.to_string(), "Failed to read scene directory \"media\"");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("No such file or directory")
        );
    }

    #[test]
    fn launch_errors_are_self_contained() {
        use std::error::Error;

        let err = ToolError::Launch {
            job: JobKind::Clip,
            program: PathBuf::from("ffmpeg"),
            error: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert_eq!(err.to_string(), "clip failed: could not run \"ffmpeg\": not found");
        assert!(err.source().is_none());
    }
}
