use std::borrow::Cow;
use std::path::{Component, Path};

use derive_more::Display;

const SEPARATOR: char = '/';

/// Absolute or relative path on the device.
///
/// Device paths are always POSIX paths, whatever the host platform is, so they
/// are kept as plain strings and joined with `/` rather than through `PathBuf`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct RemotePath(String);

impl RemotePath {
    /// Creates a remote path, stripping trailing separators (but keeping a lone `/`).
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_end_matches(SEPARATOR);
        if trimmed.is_empty() && path.starts_with(SEPARATOR) {
            Self(SEPARATOR.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, name: &str) -> Self {
        let name = name.trim_matches(SEPARATOR);
        if name.is_empty() {
            return self.clone();
        }
        if self.0.ends_with(SEPARATOR) || self.0.is_empty() {
            Self(format!("{}{name}", self.0))
        } else {
            Self(format!("{}{SEPARATOR}{name}", self.0))
        }
    }

    /// Joins a host-side relative path (a stub) component by component.
    pub fn join_relative(&self, relative: &Path) -> Self {
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .fold(self.clone(), |acc, name| acc.join(&name))
    }

    pub fn parent(&self) -> Option<Self> {
        match self.0.rsplit_once(SEPARATOR) {
            Some(("", _)) if self.0.len() > 1 => Some(Self(SEPARATOR.to_string())),
            Some(("", _)) => None,
            Some((parent, _)) => Some(Self(parent.to_string())),
            None => None,
        }
    }

    /// Returns the path quoted for embedding into a device shell command line.
    pub fn quoted(&self) -> Cow<'_, str> {
        shell_words::quote(&self.0)
    }
}

impl From<&str> for RemotePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
