use std::path::PathBuf;
use std::process::Stdio;

use snafu::{ResultExt, Snafu};
use tokio::process::Command;
use tracing::{debug, info};

use super::RemotePath;
use crate::filesystem::Stub;
use crate::output::print_from_node;

pub trait PushExecutor {
    /// Copies `sources` (files or whole directories) into `destination`.
    /// `stub` identifies the node the push was decided for.
    async fn push(
        &self,
        sources: &[PathBuf],
        destination: &RemotePath,
        stub: &Stub,
    ) -> Result<(), PushError>;
}

/// Bulk copy through `adb push`. The transfer writes straight to this
/// process's terminal so adb keeps its live progress output.
#[derive(Debug, Clone)]
pub struct AdbPush {
    adb: PathBuf,
}

impl AdbPush {
    pub fn new(adb: impl Into<PathBuf>) -> Self {
        Self { adb: adb.into() }
    }

    fn create_command(&self, sources: &[PathBuf], destination: &RemotePath) -> Command {
        let mut cmd = Command::new(&self.adb);
        cmd.arg("push").args(sources).arg(destination.as_str());
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd
    }
}

impl PushExecutor for AdbPush {
    async fn push(
        &self,
        sources: &[PathBuf],
        destination: &RemotePath,
        stub: &Stub,
    ) -> Result<(), PushError> {
        info!(
            "Pushing {} path(s) into '{}' for '{}'",
            sources.len(),
            destination,
            stub
        );
        print_from_node(
            stub,
            &format!("pushing {} path(s) into '{}'", sources.len(), destination),
        );

        let status = self
            .create_command(sources, destination)
            .status()
            .await
            .context(SpawnSnafu { stub: stub.clone() })?;

        if status.success() {
            debug!("Push for '{}' completed", stub);
            Ok(())
        } else {
            UnsuccessfulPushSnafu {
                stub: stub.clone(),
                destination: destination.clone(),
                status: status.code().unwrap_or(-1),
            }
            .fail()
        }
    }
}

/// Reports what would be pushed without touching the device.
#[derive(Debug, Clone, Default)]
pub struct DryRunPush;

impl PushExecutor for DryRunPush {
    async fn push(
        &self,
        sources: &[PathBuf],
        destination: &RemotePath,
        stub: &Stub,
    ) -> Result<(), PushError> {
        for source in sources {
            print_from_node(
                stub,
                &format!("would push '{}' -> '{}'", source.display(), destination),
            );
        }
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum PushError {
    #[snafu(display("Failed to run adb push for '{}'", stub))]
    SpawnError { stub: Stub, source: std::io::Error },
    #[snafu(display(
        "Push for '{}' into '{}' failed with exit code {}",
        stub,
        destination,
        status
    ))]
    UnsuccessfulPush {
        stub: Stub,
        destination: RemotePath,
        status: i32,
    },
}
