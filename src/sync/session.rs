use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::info;

use crate::filesystem::{Stub, TreeWalker};
use crate::remote::{PushError, PushExecutor, QueryError, RemotePath, RemoteQuery};
use crate::sync::{NodeOutcome, SyncEngine, SyncOptions, SyncReport};

/// Mirrors `source` into `destination/<source name>` on the device.
///
/// The destination directory itself must already exist. When the mirrored
/// root is absent the whole source goes over in one push and no walk happens.
pub async fn sync_tree<Q, P>(
    query: &Q,
    pusher: &P,
    source: &Path,
    destination: &RemotePath,
    options: SyncOptions,
) -> Result<SyncReport, SessionError>
where
    Q: RemoteQuery,
    P: PushExecutor,
{
    let destination_exists = query
        .exists(destination)
        .await
        .context(DestinationQuerySnafu)?;
    if !destination_exists {
        return DestinationMissingSnafu {
            path: destination.clone(),
        }
        .fail();
    }

    let name = source
        .file_name()
        .and_then(|name| name.to_str())
        .context(SourceNameSnafu {
            path: source.to_path_buf(),
        })?;
    let remote_root = destination.join(name);

    let root_exists = query
        .exists(&remote_root)
        .await
        .context(DestinationQuerySnafu)?;
    if !root_exists {
        info!("'{}' is missing, pushing the whole tree", remote_root);
        pusher
            .push(&[source.to_path_buf()], destination, &Stub::root())
            .await
            .context(RootPushSnafu)?;

        let mut report = SyncReport::default();
        report.record(NodeOutcome::PushedWholesale);
        return Ok(report);
    }

    info!("Synchronizing '{}' into '{}'", source.display(), remote_root);
    let walker = TreeWalker::new(source, remote_root);
    Ok(SyncEngine::new(query, pusher, options).run(walker).await)
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Failed to inspect the destination on the device"))]
    DestinationQuery { source: QueryError },
    #[snafu(display("Destination '{}' does not exist on the device", path))]
    DestinationMissing { path: RemotePath },
    #[snafu(display("Source '{}' has no usable directory name", path.display()))]
    SourceName { path: PathBuf },
    #[snafu(display("Failed to push the source tree"))]
    RootPush { source: PushError },
}
