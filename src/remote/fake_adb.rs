//! Stand-in `adb` executables for tests that need a real child process.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `sh` script named `adb` into `dir` and returns its
/// path. The script ignores its arguments unless `body` reads them.
pub fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("adb");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}
