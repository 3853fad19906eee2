/// Decides whether a directory can be treated as fully present on the device
/// from file counts alone.
///
/// This is an approximation: a subtree with a different set of files but the
/// same number of them passes. A manifest comparison (names plus size or
/// mtime) would replace this function without touching traversal or pushing.
pub fn is_likely_fully_synced(local_files: usize, remote_files: usize) -> bool {
    local_files == remote_files
}
