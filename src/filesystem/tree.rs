use std::fs;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashSet;
use snafu::{ResultExt, Snafu};
use tracing::debug;
use walkdir::WalkDir;

use crate::filesystem::Stub;
use crate::remote::RemotePath;

/// One local directory together with where it lives on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncNode {
    pub stub: Stub,
    pub local_path: PathBuf,
    pub remote_path: RemotePath,
    pub child_dir_names: LinkedHashSet<String>,
    pub child_file_names: LinkedHashSet<String>,
}

impl SyncNode {
    pub fn is_root(&self) -> bool {
        self.stub.is_root()
    }

    pub fn is_empty(&self) -> bool {
        self.child_dir_names.is_empty() && self.child_file_names.is_empty()
    }

    pub fn local_child(&self, name: &str) -> PathBuf {
        self.local_path.join(name)
    }

    pub fn remote_child(&self, name: &str) -> RemotePath {
        self.remote_path.join(name)
    }
}

/// Lazy top-down walk over a local tree, yielding every non-empty directory.
///
/// Nothing is cached: a new walker enumerates the filesystem from scratch.
pub struct TreeWalker {
    local_root: PathBuf,
    remote_root: RemotePath,
    entries: walkdir::IntoIter,
}

impl TreeWalker {
    pub fn new(local_root: impl Into<PathBuf>, remote_root: RemotePath) -> Self {
        let local_root = local_root.into();
        let entries = WalkDir::new(&local_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            local_root,
            remote_root,
            entries,
        }
    }

    /// Best-effort stub for a local path; paths outside the root map to the root.
    fn stub_for(&self, path: Option<&Path>) -> Stub {
        path.and_then(|path| path.strip_prefix(&self.local_root).ok())
            .map(|relative| Stub::from(relative.to_path_buf()))
            .unwrap_or_default()
    }

    fn build_node(&self, path: &Path) -> Result<SyncNode, WalkError> {
        let stub = path
            .strip_prefix(&self.local_root)
            .map(|relative| Stub::from(relative.to_path_buf()))
            .map_err(|_| WalkError::OutsideRoot {
                path: path.to_path_buf(),
            })?;

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in fs::read_dir(path).context(ReadDirSnafu { path })? {
            let entry = entry.context(ReadDirSnafu { path })?;
            let file_type = entry.file_type().context(ReadDirSnafu { path })?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|name| WalkError::NonUtf8Name {
                    path: path.join(name),
                })?;

            if file_type.is_dir() {
                dirs.push(name);
            } else if file_type.is_file() {
                files.push(name);
            }
        }
        dirs.sort();
        files.sort();

        Ok(SyncNode {
            remote_path: self.remote_root.join_relative(&stub),
            local_path: path.to_path_buf(),
            stub,
            child_dir_names: dirs.into_iter().collect(),
            child_file_names: files.into_iter().collect(),
        })
    }
}

impl Iterator for TreeWalker {
    type Item = Result<SyncNode, LocalNodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    let stub = self.stub_for(source.path());
                    return Some(Err(LocalNodeError {
                        stub,
                        source: WalkError::TraverseError { source },
                    }));
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            match self.build_node(entry.path()) {
                Ok(node) if node.is_empty() => {
                    debug!("Skipping empty directory '{}'", node.stub);
                }
                Ok(node) => return Some(Ok(node)),
                Err(source) => {
                    // Descending would only report the same unreadable directory again.
                    self.entries.skip_current_dir();
                    return Some(Err(LocalNodeError {
                        stub: self.stub_for(Some(entry.path())),
                        source,
                    }));
                }
            }
        }
    }
}

/// Counts regular files anywhere below `dir`, the local side of the
/// "fully synced" comparison.
pub fn count_regular_files(dir: &Path) -> Result<usize, WalkError> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .try_fold(0, |count, entry| {
            let entry = entry.context(TraverseSnafu)?;
            Ok(count + usize::from(entry.file_type().is_file()))
        })
}

#[derive(Debug, Snafu)]
pub enum WalkError {
    #[snafu(display("Failed to traverse the local tree"))]
    TraverseError { source: walkdir::Error },
    #[snafu(display("Failed to list local directory '{}'", path.display()))]
    ReadDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Local path '{}' is not valid UTF-8", path.display()))]
    NonUtf8Name { path: PathBuf },
    #[snafu(display("Local path '{}' is outside of the sync root", path.display()))]
    OutsideRoot { path: PathBuf },
}

/// A directory the walker could not turn into a [`SyncNode`].
#[derive(Debug, Snafu)]
#[snafu(display("Failed to read local directory '{}'", stub))]
pub struct LocalNodeError {
    pub stub: Stub,
    pub source: WalkError,
}
