//! Decides, node by node, what has to be pushed to bring the device in line
//! with the local tree.

mod completeness;
mod engine;
#[cfg(test)]
mod fake_device;
mod report;
mod session;
mod skip_set;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{NodeOutcome, SyncReport};
pub use session::{SessionError, sync_tree};
pub use skip_set::SkipSet;
