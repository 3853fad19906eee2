use std::collections::HashSet;
use std::path::PathBuf;

use crate::filesystem::Stub;

/// Stubs whose whole subtree is already taken care of in this run.
///
/// Only grows. A stub is covered when it, or any of its ancestors, was
/// inserted; the empty root stub therefore covers everything.
#[derive(Debug, Default)]
pub struct SkipSet {
    stubs: HashSet<PathBuf>,
}

impl SkipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stub: &Stub) -> bool {
        self.stubs.insert(stub.as_path().to_path_buf())
    }

    pub fn covers(&self, stub: &Stub) -> bool {
        stub.ancestors().any(|ancestor| self.stubs.contains(ancestor))
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }
}
