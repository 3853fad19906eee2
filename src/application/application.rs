use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::output::print_summary;
use crate::remote::{AdbPush, AdbShell, DryRunPush, Environment, EnvironmentError, ShellQuery};
use crate::sync::{SessionError, sync_tree};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        ensure!(
            app_config.source.is_dir(),
            SourceMissingSnafu {
                path: app_config.source.clone(),
            }
        );
        let source = resolve_source(&app_config.source)?;

        let environment = Environment::detect().await.context(EnvironmentSnafu)?;
        info!(
            "Syncing to device '{}' via {}",
            environment.device.serial,
            environment.adb.display()
        );

        let query = ShellQuery::new(AdbShell::new(environment.adb.clone()));
        let options = app_config.sync_options();
        let destination = &app_config.destination;

        let outcome = if app_config.dry_run {
            sync_tree(&query, &DryRunPush, &source, destination, options).await
        } else {
            let pusher = AdbPush::new(environment.adb.clone());
            sync_tree(&query, &pusher, &source, destination, options).await
        };
        let report = outcome.context(SessionSnafu)?;

        print_summary(&report);
        ensure!(
            report.is_success(),
            SyncFailuresSnafu {
                count: report.failure_count(),
            }
        );

        Ok(())
    }
}

/// Keeps the source as given so the device directory is named after it, even
/// when it is a symlink. Only `.`/`..`-style paths without a final name are
/// canonicalized to find one.
fn resolve_source(source: &Path) -> Result<PathBuf, ApplicationError> {
    if source.file_name().is_some() {
        return Ok(source.to_path_buf());
    }
    source.canonicalize().context(SourceResolveSnafu {
        path: source.to_path_buf(),
    })
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Source '{}' is not a directory", path.display()))]
    SourceMissing { path: PathBuf },
    #[snafu(display("Failed to resolve source '{}'", path.display()))]
    SourceResolveError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered while preparing adb"))]
    EnvironmentError { source: EnvironmentError },
    #[snafu(display("Critical failure encountered during synchronization"))]
    SessionError { source: SessionError },
    #[snafu(display("{} entries failed to sync", count))]
    SyncFailures { count: usize },
}
