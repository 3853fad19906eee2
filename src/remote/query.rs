use snafu::{ResultExt, Snafu, ensure};
use tracing::debug;

use super::{ChannelError, RemoteChannel, RemotePath};

/// Which entries a remote listing counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingScope {
    pub recursive: bool,
    pub regular_files_only: bool,
}

impl ListingScope {
    pub const IMMEDIATE: Self = Self {
        recursive: false,
        regular_files_only: false,
    };

    pub const RECURSIVE_FILES: Self = Self {
        recursive: true,
        regular_files_only: true,
    };

    fn command(&self, path: &RemotePath) -> String {
        let path = path.quoted();
        match (self.recursive, self.regular_files_only) {
            (false, false) => format!("ls -1A {path}"),
            (false, true) => format!("find {path} -mindepth 1 -maxdepth 1 -type f"),
            (true, false) => format!("find {path} -mindepth 1"),
            (true, true) => format!("find {path} -type f"),
        }
    }
}

/// Everything the sync engine needs to know about the device side.
pub trait RemoteQuery {
    async fn exists(&self, path: &RemotePath) -> Result<bool, QueryError>;

    /// Number of entries a listing of `path` yields. A failing listing is an
    /// error: the directory vanished or cannot be read.
    async fn count_entries(
        &self,
        path: &RemotePath,
        scope: ListingScope,
    ) -> Result<usize, QueryError>;

    /// Modification time in Unix seconds, `None` if the device cannot tell.
    async fn modified_time(&self, path: &RemotePath) -> Result<Option<i64>, QueryError>;
}

/// Remote queries expressed as shell commands over a [`RemoteChannel`].
#[derive(Debug, Clone)]
pub struct ShellQuery<C> {
    channel: C,
}

impl<C: RemoteChannel> ShellQuery<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

impl<C: RemoteChannel> RemoteQuery for ShellQuery<C> {
    async fn exists(&self, path: &RemotePath) -> Result<bool, QueryError> {
        let output = self
            .channel
            .run(&format!("[ -e {} ]", path.quoted()))
            .await
            .context(ChannelSnafu { path: path.clone() })?;
        Ok(output.success())
    }

    async fn count_entries(
        &self,
        path: &RemotePath,
        scope: ListingScope,
    ) -> Result<usize, QueryError> {
        let output = self
            .channel
            .run(&scope.command(path))
            .await
            .context(ChannelSnafu { path: path.clone() })?;

        ensure!(
            output.success(),
            ListingSnafu {
                path: path.clone(),
                exit_code: output.exit_code,
            }
        );

        let count = output
            .lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .count();
        debug!("Listing {:?} of '{}' counted {} entries", scope, path, count);
        Ok(count)
    }

    async fn modified_time(&self, path: &RemotePath) -> Result<Option<i64>, QueryError> {
        let output = self
            .channel
            .run(&format!("stat -c %Y {}", path.quoted()))
            .await
            .context(ChannelSnafu { path: path.clone() })?;

        if !output.success() {
            return Ok(None);
        }

        Ok(output
            .lines
            .last()
            .and_then(|line| line.trim().parse::<i64>().ok()))
    }
}

#[derive(Debug, Snafu)]
pub enum QueryError {
    #[snafu(display("Failed to query '{}' on the device", path))]
    ChannelError {
        path: RemotePath,
        source: ChannelError,
    },
    #[snafu(display("Listing '{}' on the device failed with exit code {}", path, exit_code))]
    ListingError { path: RemotePath, exit_code: i32 },
}
