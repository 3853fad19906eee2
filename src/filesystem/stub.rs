use std::fmt;
use std::path::{Path, PathBuf};

use derive_more::{Deref, From};

/// Path of a directory relative to the sync root. The empty stub is the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deref, From)]
pub struct Stub(PathBuf);

impl Stub {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for Stub {
    fn from(stub: &str) -> Self {
        Self(PathBuf::from(stub))
    }
}

impl fmt::Display for Stub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.0.display())
        }
    }
}
