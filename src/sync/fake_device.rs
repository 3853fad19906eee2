//! In-memory device used by the engine and session tests. It answers queries
//! from a map of remote paths, applies pushes to that map, and records every
//! call so tests can assert on what was asked and sent.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ext::local_modified_time;
use crate::filesystem::Stub;
use crate::remote::{
    ChannelError, ListingScope, PushError, PushExecutor, QueryError, RemotePath, RemoteQuery,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Dir,
    File { modified: Option<i64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPush {
    pub sources: Vec<PathBuf>,
    pub destination: String,
    pub stub: Stub,
}

#[derive(Debug, Default)]
pub struct FakeDevice {
    entries: RefCell<BTreeMap<String, Entry>>,
    pushes: RefCell<Vec<RecordedPush>>,
    queried: RefCell<Vec<String>>,
    broken: RefCell<HashSet<String>>,
    rejected_pushes: RefCell<HashSet<String>>,
}

impl FakeDevice {
    pub fn with_dirs(dirs: &[&str]) -> Self {
        let device = Self::default();
        for dir in dirs {
            device.add_dir(dir);
        }
        device
    }

    pub fn add_dir(&self, path: &str) {
        self.insert(path, Entry::Dir);
    }

    pub fn add_file(&self, path: &str) {
        self.insert(path, Entry::File { modified: None });
    }

    pub fn add_file_modified_at(&self, path: &str, modified: i64) {
        self.insert(path, Entry::File {
            modified: Some(modified),
        });
    }

    /// Every query touching `path` fails from now on, as if it vanished mid-run.
    pub fn break_path(&self, path: &str) {
        self.broken.borrow_mut().insert(path.to_string());
    }

    /// Pushes into `destination` fail with a non-zero exit status.
    pub fn reject_pushes_into(&self, destination: &str) {
        self.rejected_pushes
            .borrow_mut()
            .insert(destination.to_string());
    }

    pub fn has_file(&self, path: &str) -> bool {
        matches!(self.entries.borrow().get(path), Some(Entry::File { .. }))
    }

    pub fn has_dir(&self, path: &str) -> bool {
        matches!(self.entries.borrow().get(path), Some(Entry::Dir))
    }

    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.pushes.borrow().clone()
    }

    pub fn queried_paths(&self) -> Vec<String> {
        self.queried.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.pushes.borrow_mut().clear();
        self.queried.borrow_mut().clear();
    }

    fn insert(&self, path: &str, entry: Entry) {
        let path = RemotePath::new(path);
        let mut entries = self.entries.borrow_mut();
        let mut parent = path.parent();
        while let Some(dir) = parent {
            entries.entry(dir.as_str().to_string()).or_insert(Entry::Dir);
            parent = dir.parent();
        }
        entries.insert(path.as_str().to_string(), entry);
    }

    fn record_query(&self, path: &RemotePath) -> Result<(), QueryError> {
        self.queried.borrow_mut().push(path.as_str().to_string());
        if self.broken.borrow().contains(path.as_str()) {
            return Err(QueryError::ChannelError {
                path: path.clone(),
                source: ChannelError::MissingStatus {
                    command: format!("query {path}"),
                },
            });
        }
        Ok(())
    }

    fn copy_local(&self, source: &Path, target: &RemotePath) {
        for entry in WalkDir::new(source).into_iter().filter_map(Result::ok) {
            let Ok(relative) = entry.path().strip_prefix(source) else {
                continue;
            };
            let remote = target.join_relative(relative);
            if entry.file_type().is_dir() {
                self.insert(remote.as_str(), Entry::Dir);
            } else if entry.file_type().is_file() {
                self.insert(remote.as_str(), Entry::File {
                    modified: local_modified_time(entry.path()),
                });
            }
        }
    }
}

impl RemoteQuery for FakeDevice {
    async fn exists(&self, path: &RemotePath) -> Result<bool, QueryError> {
        self.record_query(path)?;
        Ok(self.entries.borrow().contains_key(path.as_str()))
    }

    async fn count_entries(
        &self,
        path: &RemotePath,
        scope: ListingScope,
    ) -> Result<usize, QueryError> {
        self.record_query(path)?;
        if !self.has_dir(path.as_str()) {
            return Err(QueryError::ListingError {
                path: path.clone(),
                exit_code: 1,
            });
        }

        let prefix = format!("{}/", path.as_str().trim_end_matches('/'));
        let count = self
            .entries
            .borrow()
            .iter()
            .filter_map(|(candidate, entry)| {
                candidate.strip_prefix(&prefix).map(|rest| (rest, entry))
            })
            .filter(|(rest, _)| scope.recursive || !rest.contains('/'))
            .filter(|(_, entry)| !scope.regular_files_only || matches!(entry, Entry::File { .. }))
            .count();
        Ok(count)
    }

    async fn modified_time(&self, path: &RemotePath) -> Result<Option<i64>, QueryError> {
        self.record_query(path)?;
        Ok(match self.entries.borrow().get(path.as_str()) {
            Some(Entry::File { modified }) => *modified,
            _ => None,
        })
    }
}

impl PushExecutor for FakeDevice {
    async fn push(
        &self,
        sources: &[PathBuf],
        destination: &RemotePath,
        stub: &Stub,
    ) -> Result<(), PushError> {
        self.pushes.borrow_mut().push(RecordedPush {
            sources: sources.to_vec(),
            destination: destination.as_str().to_string(),
            stub: stub.clone(),
        });

        if self.rejected_pushes.borrow().contains(destination.as_str()) {
            return Err(PushError::UnsuccessfulPush {
                stub: stub.clone(),
                destination: destination.clone(),
                status: 1,
            });
        }

        for source in sources {
            let name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.copy_local(source, &destination.join(&name));
        }
        Ok(())
    }
}
