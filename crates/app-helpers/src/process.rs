use std::{
    ffi::OsStr,
    io,
    process::{Command, ExitStatus, Stdio},
};

use log::{debug, trace};

/// What a finished child process left behind.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stderr: String,
}

impl CapturedOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// `None` if the process was killed by a signal.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// The last `lines` non-blank lines of stderr, oldest first.
    #[must_use]
    pub fn stderr_tail(&self, lines: usize) -> String {
        let mut tail = self
            .stderr
            .lines()
            .rev()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .take(lines)
            .collect::<Vec<_>>();
        tail.reverse();

        tail.join("\n")
    }
}

/// Runs `cmd` to completion, blocking.
///
/// Stdin is closed and stdout discarded; stderr is captured. Only failing to
/// spawn is an `Err`, a non-zero exit is reported through [`CapturedOutput`].
pub fn run_captured(cmd: &mut Command) -> io::Result<CapturedOutput> {
    debug!("Running command: {}", command_line(cmd));

    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()?;

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    trace!("Command exited with {status}", status = output.status);

    Ok(CapturedOutput {
        status: output.status,
        stderr,
    })
}

/// Renders `cmd` the way it would be typed into a shell.
#[must_use]
pub fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();

    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));

    if is_plain {
        arg.into_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
