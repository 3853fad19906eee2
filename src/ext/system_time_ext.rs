use std::path::Path;
use std::time::SystemTime;

pub trait SystemTimeExt {
    /// Whole seconds since the Unix epoch, negative for earlier times.
    fn unix_seconds(&self) -> i64;
}

impl SystemTimeExt for SystemTime {
    fn unix_seconds(&self) -> i64 {
        match self.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_secs())
                .map(|secs| -secs)
                .unwrap_or(i64::MIN),
        }
    }
}

/// Local modification time in Unix seconds, the same resolution `stat -c %Y`
/// reports on the device.
pub fn local_modified_time(path: &Path) -> Option<i64> {
    path.metadata()
        .ok()
        .and_then(|meta| meta.modified().ok())
        .map(|time| time.unix_seconds())
}
