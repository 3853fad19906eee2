//! Local side of the sync: the directory walk and the stubs that tie local
//! directories to their device counterparts.

mod stub;
mod tree;

pub use stub::Stub;
pub use tree::{LocalNodeError, SyncNode, TreeWalker, WalkError, count_regular_files};
