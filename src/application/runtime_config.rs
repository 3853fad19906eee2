use std::path::PathBuf;

use crate::cli::Cli;
use crate::remote::RemotePath;
use crate::sync::SyncOptions;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub source: PathBuf,
    pub destination: RemotePath,
    pub dry_run: bool,
    pub update: bool,
}

impl RuntimeConfig {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            update_newer: self.update,
        }
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.source,
            destination: RemotePath::new(cli.destination),
            dry_run: cli.dry_run,
            update: cli.update,
        }
    }
}
