use std::path::PathBuf;
use std::process::Stdio;

use snafu::{OptionExt, ResultExt, Snafu};
use tokio::process::Command;
use tracing::debug;

/// Printed after every device command, directly followed by the command's exit code.
const STATUS_MARKER: &str = "__ADB_PUSH_SYNC_STATUS__";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub lines: Vec<String>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait RemoteChannel {
    /// Runs `command` in the device shell and returns its exit code together
    /// with the captured standard output, split into lines.
    async fn run(&self, command: &str) -> Result<CommandOutput, ChannelError>;
}

/// One-shot `adb shell` invocations, one process per command.
#[derive(Debug, Clone)]
pub struct AdbShell {
    adb: PathBuf,
}

impl AdbShell {
    pub fn new(adb: impl Into<PathBuf>) -> Self {
        Self { adb: adb.into() }
    }

    fn wrap_command(command: &str) -> String {
        format!("{command}; echo {STATUS_MARKER}$?")
    }

    fn create_command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.adb);
        cmd.arg("shell").arg(Self::wrap_command(command));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }
}

impl RemoteChannel for AdbShell {
    async fn run(&self, command: &str) -> Result<CommandOutput, ChannelError> {
        debug!("Running device command: {command}");

        let output = self
            .create_command(command)
            .output()
            .await
            .context(SpawnSnafu { command })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_status_output(command, &stdout) {
            Err(ChannelError::MissingStatus { .. }) if !output.status.success() => {
                TransportSnafu {
                    command,
                    status: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                }
                .fail()
            }
            result => {
                if let Ok(parsed) = &result {
                    debug!(
                        "Device command exited with {} ({} lines of output)",
                        parsed.exit_code,
                        parsed.lines.len()
                    );
                }
                result
            }
        }
    }
}

/// Splits raw shell output into the command's own lines and the exit code
/// reported by the trailing status probe.
fn parse_status_output(command: &str, stdout: &str) -> Result<CommandOutput, ChannelError> {
    let mut lines: Vec<String> = stdout
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();

    let status_index = lines
        .iter()
        .rposition(|line| line.contains(STATUS_MARKER))
        .context(MissingStatusSnafu { command })?;

    let status_line = lines[status_index].clone();
    lines.truncate(status_index);

    let (leading, status) = status_line
        .rsplit_once(STATUS_MARKER)
        .context(MissingStatusSnafu { command })?;
    // Output without a trailing newline shares its last line with the probe.
    if !leading.is_empty() {
        lines.push(leading.to_string());
    }

    let status = status.trim();
    let exit_code = status.parse::<i32>().context(InvalidStatusSnafu {
        command,
        value: status,
    })?;

    Ok(CommandOutput { exit_code, lines })
}

#[derive(Debug, Snafu)]
pub enum ChannelError {
    #[snafu(display("Failed to spawn adb for device command '{}'", command))]
    SpawnError {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display(
        "adb exited with status {} while running '{}': {}",
        status,
        command,
        stderr
    ))]
    TransportError {
        command: String,
        status: i32,
        stderr: String,
    },
    #[snafu(display("Device command '{}' produced no exit status", command))]
    MissingStatus { command: String },
    #[snafu(display("Device command '{}' reported an invalid exit status '{}'", command, value))]
    InvalidStatus {
        command: String,
        value: String,
        source: std::num::ParseIntError,
    },
}
