//! Command history, one line per entry in a dotfile.

use tracing::warn;

use crate::fs::{FsError, Vfs};

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    path: String,
    limit: usize,
}

impl History {
    pub fn load(vfs: &Vfs, path: &str, limit: usize) -> Self {
        let mut entries: Vec<String> = match vfs.read_file(path) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(FsError::NotFound { .. }) => Vec::new(),
            Err(e) => {
                warn!("cannot read history file {}: {}", path, e);
                Vec::new()
            }
        };
        let excess = entries.len().saturating_sub(limit);
        entries.drain(..excess);
        Self {
            entries,
            path: path.to_string(),
            limit,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn persist(&self, vfs: &mut Vfs) {
        let mut text = self.entries.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        if let Err(e) = vfs.write_file(&self.path, &text, false) {
            warn!("cannot save history: {}", e);
        }
    }

    /// Append a line. Persisting is best effort: failures are only logged.
    pub fn record(&mut self, vfs: &mut Vfs, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.contains('\n') || self.limit == 0 {
            return;
        }
        self.entries.push(line.to_string());
        let excess = self.entries.len().saturating_sub(self.limit);
        self.entries.drain(..excess);
        self.persist(vfs);
    }

    pub fn clear(&mut self, vfs: &mut Vfs) {
        self.entries.clear();
        self.persist(vfs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MemoryStore, VfsOptions};

    #[test]
    fn test_record_caps_and_persists() {
        let store = MemoryStore::default();
        let mut vfs = Vfs::open(Box::new(store.clone()), VfsOptions::default());
        let mut history = History::load(&vfs, "/home/guest/.history", 3);
        for cmd in ["ls", "pwd", "  ", "cd /tmp", "cat x"] {
            history.record(&mut vfs, cmd);
        }
        assert_eq!(history.entries(), ["pwd", "cd /tmp", "cat x"]);

        let vfs2 = Vfs::open(Box::new(store), VfsOptions::default());
        let reloaded = History::load(&vfs2, "/home/guest/.history", 2);
        assert_eq!(reloaded.entries(), ["cd /tmp", "cat x"]);
    }

    #[test]
    fn test_clear() {
        let mut vfs = Vfs::open(Box::new(MemoryStore::default()), VfsOptions::default());
        let mut history = History::load(&vfs, "/home/guest/.history", 10);
        history.record(&mut vfs, "ls");
        history.clear(&mut vfs);
        assert!(history.entries().is_empty());
        assert_eq!(vfs.read_file("/home/guest/.history").unwrap(), "");
    }
}
