//! Device side of the sync. Everything the engine learns about the device
//! goes through [`RemoteQuery`], everything it sends through [`PushExecutor`];
//! the adb-backed implementations are just one way to satisfy them.

mod channel;
mod environment;
#[cfg(all(test, unix))]
mod fake_adb;
mod push;
mod query;
mod remote_path;

pub use channel::{AdbShell, ChannelError, RemoteChannel};
pub use environment::{Environment, EnvironmentError};
pub use push::{AdbPush, DryRunPush, PushError, PushExecutor};
pub use query::{ListingScope, QueryError, RemoteQuery, ShellQuery};
pub use remote_path::RemotePath;
