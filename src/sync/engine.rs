use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, error, info, warn};

use crate::ext::local_modified_time;
use crate::filesystem::{LocalNodeError, Stub, SyncNode, WalkError, count_regular_files};
use crate::output::{error_chain, print_failure};
use crate::remote::{ListingScope, PushError, PushExecutor, QueryError, RemotePath, RemoteQuery};
use crate::sync::completeness::is_likely_fully_synced;
use crate::sync::{NodeOutcome, SkipSet, SyncReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Re-push files whose local copy is newer than the device copy. Count
    /// equality is never trusted in this mode.
    pub update_newer: bool,
}

/// Walks nodes top-down and decides, per node, what has to be pushed.
///
/// The engine owns the skip-set: once a node is pushed wholesale or looks
/// complete, none of its descendants is queried or pushed again in this run.
pub struct SyncEngine<'a, Q, P> {
    query: &'a Q,
    pusher: &'a P,
    options: SyncOptions,
    skip_set: SkipSet,
    report: SyncReport,
}

impl<'a, Q, P> SyncEngine<'a, Q, P>
where
    Q: RemoteQuery,
    P: PushExecutor,
{
    pub fn new(query: &'a Q, pusher: &'a P, options: SyncOptions) -> Self {
        Self {
            query,
            pusher,
            options,
            skip_set: SkipSet::new(),
            report: SyncReport::default(),
        }
    }

    /// Processes every node in order. Failures are reported and counted but
    /// never stop the run.
    pub async fn run<I>(mut self, nodes: I) -> SyncReport
    where
        I: IntoIterator<Item = Result<SyncNode, LocalNodeError>>,
    {
        for node in nodes {
            let node = match node {
                Ok(node) => node,
                Err(err) if self.skip_set.covers(&err.stub) => {
                    debug!("Ignoring local error inside synced subtree: {}", err);
                    continue;
                }
                Err(err) => {
                    let stub = err.stub.clone();
                    self.fail(stub, &err);
                    continue;
                }
            };

            if self.skip_set.covers(&node.stub) {
                debug!("Skipping '{}', already covered", node.stub);
                self.report.record_skipped();
                continue;
            }

            debug!("Evaluating '{}'", node.stub);
            match self.process_node(&node).await {
                Ok(outcome) => {
                    debug!("'{}' -> {:?}", node.stub, outcome);
                    if outcome.covers_subtree() {
                        self.skip_set.insert(&node.stub);
                    }
                    self.report.record(outcome);
                }
                Err(err) => self.fail(node.stub.clone(), &err),
            }
        }

        debug!("{} subtree(s) marked as synchronized", self.skip_set.len());
        self.report
    }

    fn fail(&mut self, stub: Stub, err: &(dyn std::error::Error + 'static)) {
        let message = error_chain(err);
        error!("Failed to sync '{}': {}", stub, message);
        print_failure(&stub, &message);
        self.report.record_failure(stub, message);
    }

    async fn process_node(&self, node: &SyncNode) -> Result<NodeOutcome, NodeError> {
        // The root is known to exist: the session checked it before walking.
        if !node.is_root() {
            let exists = self
                .query
                .exists(&node.remote_path)
                .await
                .context(QuerySnafu)?;
            if !exists {
                debug!("'{}' is missing on the device", node.remote_path);
                return self.push_wholesale(node).await;
            }

            let entries = self
                .query
                .count_entries(&node.remote_path, ListingScope::IMMEDIATE)
                .await
                .context(QuerySnafu)?;
            if entries == 0 {
                debug!("'{}' is empty on the device", node.remote_path);
                return self.push_wholesale(node).await;
            }
        }

        let pushed_files = self.push_missing_files(node).await?;

        if self.options.update_newer {
            return Ok(NodeOutcome::Incomplete { pushed_files });
        }

        let local_files = count_regular_files(&node.local_path).context(LocalCountSnafu)?;
        let remote_files = self
            .query
            .count_entries(&node.remote_path, ListingScope::RECURSIVE_FILES)
            .await
            .context(QuerySnafu)?;
        debug!(
            "'{}' has {} local and {} remote files",
            node.stub, local_files, remote_files
        );

        if is_likely_fully_synced(local_files, remote_files) {
            Ok(NodeOutcome::Complete { pushed_files })
        } else {
            Ok(NodeOutcome::Incomplete { pushed_files })
        }
    }

    /// Pushes the local directory into the parent of its remote path; the
    /// push recreates the directory under its own name.
    async fn push_wholesale(&self, node: &SyncNode) -> Result<NodeOutcome, NodeError> {
        let parent = node.remote_path.parent().context(NoRemoteParentSnafu {
            path: node.remote_path.clone(),
        })?;

        info!("Pushing '{}' wholesale into '{}'", node.stub, parent);
        self.pusher
            .push(&[node.local_path.clone()], &parent, &node.stub)
            .await
            .context(PushSnafu)?;

        Ok(NodeOutcome::PushedWholesale)
    }

    /// Pushes, in a single call, every child file the device lacks (or, in
    /// update mode, holds an older copy of). Returns how many were pushed.
    async fn push_missing_files(&self, node: &SyncNode) -> Result<usize, NodeError> {
        let mut pending: Vec<PathBuf> = Vec::new();

        for name in &node.child_file_names {
            let remote = node.remote_child(name);
            let local = node.local_child(name);

            if !self.query.exists(&remote).await.context(QuerySnafu)? {
                debug!("'{}' is missing on the device", remote);
                pending.push(local);
            } else if self.options.update_newer && self.is_stale(&local, &remote).await? {
                debug!("'{}' is older on the device", remote);
                pending.push(local);
            }
        }

        if pending.is_empty() {
            return Ok(0);
        }

        info!(
            "Pushing {} file(s) into '{}'",
            pending.len(),
            node.remote_path
        );
        self.pusher
            .push(&pending, &node.remote_path, &node.stub)
            .await
            .context(PushSnafu)?;

        Ok(pending.len())
    }

    async fn is_stale(&self, local: &Path, remote: &RemotePath) -> Result<bool, NodeError> {
        let remote_time = self
            .query
            .modified_time(remote)
            .await
            .context(QuerySnafu)?;

        match (local_modified_time(local), remote_time) {
            (Some(local_time), Some(remote_time)) => Ok(local_time > remote_time),
            (_, None) => {
                warn!("Cannot read modification time of '{}', pushing it again", remote);
                Ok(true)
            }
            (None, Some(_)) => Ok(false),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum NodeError {
    #[snafu(display("Device query failed"))]
    QueryError { source: QueryError },
    #[snafu(display("Push failed"))]
    PushError { source: PushError },
    #[snafu(display("Failed to count local files"))]
    LocalCountError { source: WalkError },
    #[snafu(display("'{}' has no parent directory on the device", path))]
    NoRemoteParent { path: RemotePath },
}
