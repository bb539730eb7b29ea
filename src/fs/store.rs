//! Backing stores
//!
//! A store holds exactly one blob: the latest encoded snapshot.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("blob of {size} bytes exceeds store capacity of {capacity} bytes")]
    Full { size: usize, capacity: usize },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Durable location for the snapshot blob.
pub trait SnapshotStore: Send {
    /// The stored blob, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored blob.
    fn save(&mut self, blob: &str) -> Result<(), StoreError>;

    /// Bytes the store can hold.
    fn capacity(&self) -> usize;
}

/// In-memory store. Clones share the same slot, so a second session can
/// reload what the first one saved.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            capacity,
        }
    }

    /// Seed the slot with an arbitrary blob.
    pub fn with_blob(capacity: usize, blob: &str) -> Self {
        let store = Self::new(capacity);
        if let Ok(mut slot) = store.slot.lock() {
            *slot = Some(blob.to_string());
        }
        store
    }

    /// Current blob, for inspection.
    pub fn blob(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(5 * 1024 * 1024)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        if blob.len() > self.capacity {
            return Err(StoreError::Full {
                size: blob.len(),
                capacity: self.capacity,
            });
        }
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(blob.to_string());
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Store backed by a single file on the host.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    capacity: usize,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        if blob.len() > self.capacity {
            return Err(StoreError::Full {
                size: blob.len(),
                capacity: self.capacity,
            });
        }
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        // write-then-rename so a crash never leaves half a blob
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, blob)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
