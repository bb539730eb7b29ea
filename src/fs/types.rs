//! File System Types
//!
//! Core types for the virtual file system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::StoreError;

/// Which ceiling a rejected mutation would have crossed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quota {
    FileSize { size: usize, limit: usize },
    EntryCount { limit: usize },
    SnapshotBytes { size: usize, limit: usize },
}

impl std::fmt::Display for Quota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quota::FileSize { size, limit } => {
                write!(f, "file size {} exceeds limit of {} bytes", size, limit)
            }
            Quota::EntryCount { limit } => write!(f, "too many entries (limit {})", limit),
            Quota::SnapshotBytes { size, limit } => {
                write!(f, "storage full ({} of {} bytes)", size, limit)
            }
        }
    }
}

/// File system errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("{path}: No such file or directory")]
    NotFound { path: String },

    #[error("{path}: Is a directory")]
    NotAFile { path: String },

    #[error("{path}: Not a directory")]
    NotADirectory { path: String },

    #[error("{path}: File exists")]
    AlreadyExists { path: String },

    #[error("{path}: Directory not empty")]
    NotEmpty { path: String },

    #[error("quota exceeded: {0}")]
    QuotaExceeded(Quota),

    #[error("{path}: Invalid path ({reason})")]
    InvalidPath { path: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for FsError {
    fn from(e: StoreError) -> Self {
        FsError::Storage(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One node of the file system, keyed elsewhere by its normalized path.
///
/// Directories hold no content; their children are derived from the keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Epoch milliseconds.
    pub created: i64,
    /// Epoch milliseconds.
    pub modified: i64,
    pub permissions: String,
    pub owner: String,
    pub group: String,
}

impl Entry {
    pub fn directory(owner: &str, now: i64) -> Self {
        Self {
            kind: EntryKind::Directory,
            content: None,
            size: None,
            created: now,
            modified: now,
            permissions: "drwxr-xr-x".to_string(),
            owner: owner.to_string(),
            group: owner.to_string(),
        }
    }

    pub fn file(owner: &str, content: String, now: i64) -> Self {
        Self {
            kind: EntryKind::File,
            size: Some(content.len() as u64),
            content: Some(content),
            created: now,
            modified: now,
            permissions: "-rw-r--r--".to_string(),
            owner: owner.to_string(),
            group: owner.to_string(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// File content; empty for directories.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    /// Replace the content, keeping `size` in step and `created` untouched.
    pub fn set_content(&mut self, content: String, now: i64) {
        self.size = Some(content.len() as u64);
        self.content = Some(content);
        self.modified = now;
    }
}

/// A child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: i64,
    pub permissions: String,
    pub owner: String,
}

impl DirEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
