//! File System Module
//!
//! The virtual file system and everything it needs to persist itself:
//! - path: canonical path algebra
//! - types: entries, listings and errors
//! - store: backing stores for the encoded snapshot
//! - vfs: the path-keyed entry store

pub mod path;
pub mod store;
pub mod types;
pub mod vfs;

pub use path::normalize_path;
pub use store::{FileStore, MemoryStore, SnapshotStore, StoreError};
pub use types::*;
pub use vfs::{Snapshot, Vfs, VfsOptions};
