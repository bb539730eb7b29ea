//! Virtual File System
//!
//! A flat, path-keyed store of files and directories. Every mutation is
//! staged on a copy of the entry map, checked against the limits, persisted as
//! a whole snapshot and only then swapped in, so a rejected call leaves both
//! the in-memory state and the backing store untouched.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::path::{ancestors, depth, file_name, is_descendant, join, normalize_path, parent};
use super::store::SnapshotStore;
use super::types::*;
use crate::codec;
use crate::config::Limits;

/// Durable image of the whole file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub file_system: Vec<(String, Entry)>,
    pub current_directory: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    file_system: Vec<(&'a str, &'a Entry)>,
    current_directory: &'a str,
}

/// Session identity and persistence settings for [`Vfs::open`].
#[derive(Debug, Clone)]
pub struct VfsOptions {
    pub owner: String,
    pub hostname: String,
    pub home: String,
    pub compress: bool,
    pub limits: Limits,
}

impl Default for VfsOptions {
    fn default() -> Self {
        Self {
            owner: "guest".to_string(),
            hostname: "portfolio".to_string(),
            home: "/home/guest".to_string(),
            compress: true,
            limits: Limits::default(),
        }
    }
}

pub struct Vfs {
    entries: IndexMap<String, Entry>,
    cwd: String,
    root: Entry,
    store: Box<dyn SnapshotStore>,
    options: VfsOptions,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Vfs {
    /// Load the snapshot held by `store`, or lay out the defaults when there
    /// is none or it cannot be decoded. Never fails.
    pub fn open(store: Box<dyn SnapshotStore>, options: VfsOptions) -> Self {
        let root = Entry::directory("root", now_ms());
        let mut vfs = Self {
            entries: IndexMap::new(),
            cwd: "/".to_string(),
            root,
            store,
            options,
        };

        let loaded = match vfs.store.load() {
            Ok(Some(blob)) => match decode_snapshot(&blob) {
                Ok(snapshot) => Some(snapshot),
                Err(reason) => {
                    warn!(
                        compressed = codec::is_compressed(&blob),
                        "discarding corrupt snapshot: {}", reason
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("cannot read snapshot store: {}", e);
                None
            }
        };

        match loaded {
            Some(snapshot) => vfs.restore(snapshot),
            None => vfs.init_defaults(),
        }
        vfs
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let now = now_ms();
        let mut entries: IndexMap<String, Entry> = IndexMap::new();
        for (key, mut entry) in snapshot.file_system {
            let canonical = normalize_path(&key, "/");
            if canonical != key || key == "/" {
                warn!("skipping non-canonical snapshot key '{}'", key);
                continue;
            }
            for ancestor in ancestors(&key) {
                entries
                    .entry(ancestor)
                    .or_insert_with(|| Entry::directory(&self.options.owner, now));
            }
            match entry.kind {
                EntryKind::File => {
                    let content = entry.content.take().unwrap_or_default();
                    entry.size = Some(content.len() as u64);
                    entry.content = Some(content);
                }
                EntryKind::Directory => {
                    entry.content = None;
                    entry.size = None;
                }
            }
            entries.insert(key, entry);
        }

        let cwd = normalize_path(&snapshot.current_directory, "/");
        let cwd_ok = cwd == "/" || entries.get(&cwd).is_some_and(|e| e.is_directory());
        self.entries = entries;
        self.cwd = if cwd_ok { cwd } else { "/".to_string() };
        debug!(entries = self.entries.len(), cwd = %self.cwd, "snapshot restored");
    }

    fn init_defaults(&mut self) {
        let now = now_ms();
        let owner = self.options.owner.clone();
        let home = normalize_path(&self.options.home, "/");
        let mut entries = IndexMap::new();

        for dir in ["/bin", "/etc", "/home", "/tmp", "/var", "/var/log"] {
            entries.insert(dir.to_string(), Entry::directory("root", now));
        }
        for ancestor in ancestors(&home) {
            entries
                .entry(ancestor)
                .or_insert_with(|| Entry::directory("root", now));
        }
        entries.insert(home.clone(), Entry::directory(&owner, now));
        entries.insert(
            "/etc/hostname".to_string(),
            Entry::file("root", format!("{}\n", self.options.hostname), now),
        );
        entries.insert(
            "/etc/motd".to_string(),
            Entry::file("root", "Welcome! Type 'help' to list commands.\n".to_string(), now),
        );
        entries.insert(
            join(&home, "README.txt"),
            Entry::file(
                &owner,
                "This machine lives in your browser tab.\nTry: ls, cat, mkdir, echo hi > note.txt\n"
                    .to_string(),
                now,
            ),
        );

        if let Err(e) = self.persist(&entries, &home) {
            warn!("cannot persist default layout: {}", e);
        }
        self.entries = entries;
        self.cwd = home;
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Byte budget for an encoded snapshot: the configured ceiling, further
    /// bounded to 90% of what the store can hold.
    pub fn snapshot_budget(&self) -> usize {
        let capacity_share = self.store.capacity() / 10 * 9;
        self.options.limits.max_snapshot_bytes.min(capacity_share)
    }

    fn encode(&self, entries: &IndexMap<String, Entry>, cwd: &str) -> Result<String, FsError> {
        let snapshot = SnapshotRef {
            file_system: entries.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            current_directory: cwd,
        };
        let json = serde_json::to_string(&snapshot).map_err(|e| FsError::Storage(e.to_string()))?;
        Ok(if self.options.compress {
            codec::compress(&json)
        } else {
            json
        })
    }

    fn persist(&mut self, entries: &IndexMap<String, Entry>, cwd: &str) -> Result<(), FsError> {
        if entries.len() > self.options.limits.max_entries {
            return Err(FsError::QuotaExceeded(Quota::EntryCount {
                limit: self.options.limits.max_entries,
            }));
        }
        let blob = self.encode(entries, cwd)?;
        let budget = self.snapshot_budget();
        if blob.len() > budget {
            return Err(FsError::QuotaExceeded(Quota::SnapshotBytes {
                size: blob.len(),
                limit: budget,
            }));
        }
        self.store.save(&blob)?;
        debug!(bytes = blob.len(), entries = entries.len(), "snapshot saved");
        Ok(())
    }

    fn commit(&mut self, staged: IndexMap<String, Entry>, cwd: String) -> Result<(), FsError> {
        self.persist(&staged, &cwd)?;
        self.entries = staged;
        self.cwd = cwd;
        Ok(())
    }

    /// Copy of the current state, as it would be persisted.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            file_system: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            current_directory: self.cwd.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn home(&self) -> &str {
        &self.options.home
    }

    pub fn owner(&self) -> &str {
        &self.options.owner
    }

    pub fn limits(&self) -> &Limits {
        &self.options.limits
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Canonical form of `path` relative to the working directory.
    pub fn resolve(&self, path: &str) -> Result<String, FsError> {
        let limit = self.options.limits.max_path_length;
        let too_long = |path: &str| FsError::InvalidPath {
            path: format!("{}...", path.chars().take(32).collect::<String>()),
            reason: format!("longer than {} bytes", limit),
        };
        if path.len() > limit {
            return Err(too_long(path));
        }
        let canonical = normalize_path(path, &self.cwd);
        if canonical.len() > limit {
            return Err(too_long(&canonical));
        }
        Ok(canonical)
    }

    fn lookup(&self, canonical: &str) -> Option<&Entry> {
        if canonical == "/" {
            Some(&self.root)
        } else {
            self.entries.get(canonical)
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|p| self.lookup(&p).is_some())
            .unwrap_or(false)
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.resolve(path)
            .ok()
            .and_then(|p| self.lookup(&p).map(Entry::is_directory))
            .unwrap_or(false)
    }

    pub fn stat(&self, path: &str) -> Result<Entry, FsError> {
        let target = self.resolve(path)?;
        self.lookup(&target)
            .cloned()
            .ok_or(FsError::NotFound { path: target })
    }

    pub fn read_file(&self, path: &str) -> Result<String, FsError> {
        let target = self.resolve(path)?;
        match self.lookup(&target) {
            Some(e) if e.is_file() => Ok(e.content().to_string()),
            Some(_) => Err(FsError::NotAFile { path: target }),
            None => Err(FsError::NotFound { path: target }),
        }
    }

    /// Immediate children of a directory, sorted by name.
    pub fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let target = self.resolve(path)?;
        match self.lookup(&target) {
            Some(e) if e.is_directory() => {}
            Some(_) => return Err(FsError::NotADirectory { path: target }),
            None => return Err(FsError::NotFound { path: target }),
        }

        let mut children: Vec<DirEntry> = self
            .entries
            .iter()
            .filter(|(key, _)| is_descendant(key, &target) && parent(key) == target)
            .map(|(key, e)| DirEntry {
                name: file_name(key).to_string(),
                kind: e.kind,
                size: e.size(),
                modified: e.modified,
                permissions: e.permissions.clone(),
                owner: e.owner.clone(),
            })
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    /// `path` itself followed by every entry below it, in path order.
    pub fn walk(&self, path: &str) -> Result<Vec<(String, Entry)>, FsError> {
        let target = self.resolve(path)?;
        let top = self
            .lookup(&target)
            .cloned()
            .ok_or_else(|| FsError::NotFound { path: target.clone() })?;

        let mut below: Vec<(String, Entry)> = self
            .entries
            .iter()
            .filter(|(key, _)| is_descendant(key, &target))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        below.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = vec![(target, top)];
        out.extend(below);
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create missing ancestors of `target` in `staged`.
    fn ensure_parents(
        &self,
        staged: &mut IndexMap<String, Entry>,
        target: &str,
        now: i64,
    ) -> Result<(), FsError> {
        for ancestor in ancestors(target) {
            match staged.get(&ancestor) {
                Some(e) if e.is_file() => return Err(FsError::NotADirectory { path: ancestor }),
                Some(_) => {}
                None => {
                    staged.insert(ancestor, Entry::directory(&self.options.owner, now));
                }
            }
        }
        Ok(())
    }

    fn check_depth(&self, target: &str) -> Result<(), FsError> {
        let limit = self.options.limits.max_directory_depth;
        if depth(target) > limit {
            return Err(FsError::InvalidPath {
                path: target.to_string(),
                reason: format!("nested deeper than {} levels", limit),
            });
        }
        Ok(())
    }

    pub fn create_directory(&mut self, path: &str, recursive: bool) -> Result<(), FsError> {
        let target = self.resolve(path)?;
        self.check_depth(&target)?;
        match self.lookup(&target) {
            Some(e) if e.is_file() => return Err(FsError::AlreadyExists { path: target }),
            Some(_) if recursive => return Ok(()),
            Some(_) => return Err(FsError::AlreadyExists { path: target }),
            None => {}
        }

        let now = now_ms();
        let mut staged = self.entries.clone();
        if recursive {
            self.ensure_parents(&mut staged, &target, now)?;
        } else {
            let dir = parent(&target);
            match self.lookup(dir) {
                Some(e) if e.is_file() => {
                    return Err(FsError::NotADirectory { path: dir.to_string() })
                }
                Some(_) => {}
                None => return Err(FsError::NotFound { path: dir.to_string() }),
            }
        }
        staged.insert(target, Entry::directory(&self.options.owner, now));
        self.commit(staged, self.cwd.clone())
    }

    /// Write (or append to) a file, creating missing ancestors.
    pub fn write_file(&mut self, path: &str, content: &str, append: bool) -> Result<(), FsError> {
        let target = self.resolve(path)?;
        self.check_depth(&target)?;
        let existing = self.lookup(&target);
        if existing.is_some_and(Entry::is_directory) {
            return Err(FsError::NotAFile { path: target });
        }

        let new_content = match existing {
            Some(e) if append => format!("{}{}", e.content(), content),
            _ => content.to_string(),
        };
        let limit = self.options.limits.max_file_size;
        if new_content.len() > limit {
            return Err(FsError::QuotaExceeded(Quota::FileSize {
                size: new_content.len(),
                limit,
            }));
        }

        let now = now_ms();
        let mut staged = self.entries.clone();
        self.ensure_parents(&mut staged, &target, now)?;
        match staged.get_mut(&target) {
            Some(entry) => entry.set_content(new_content, now),
            None => {
                staged.insert(target, Entry::file(&self.options.owner, new_content, now));
            }
        }
        self.commit(staged, self.cwd.clone())
    }

    /// Create an empty file, or refresh the modification time of an existing entry.
    pub fn touch(&mut self, path: &str) -> Result<(), FsError> {
        let target = self.resolve(path)?;
        if target == "/" {
            return Ok(());
        }
        if !self.entries.contains_key(&target) {
            return self.write_file(&target, "", false);
        }
        let mut staged = self.entries.clone();
        if let Some(entry) = staged.get_mut(&target) {
            entry.modified = now_ms();
        }
        self.commit(staged, self.cwd.clone())
    }

    pub fn delete_file(&mut self, path: &str) -> Result<(), FsError> {
        let target = self.resolve(path)?;
        match self.lookup(&target) {
            Some(e) if e.is_file() => {}
            Some(_) => return Err(FsError::NotAFile { path: target }),
            None => return Err(FsError::NotFound { path: target }),
        }
        let mut staged = self.entries.clone();
        staged.shift_remove(&target);
        self.commit(staged, self.cwd.clone())
    }

    /// Remove a directory. Without `recursive` it must have no children.
    pub fn remove_directory(&mut self, path: &str, recursive: bool) -> Result<(), FsError> {
        let target = self.resolve(path)?;
        if target == "/" {
            return Err(FsError::InvalidPath {
                path: target,
                reason: "cannot remove root".to_string(),
            });
        }
        match self.lookup(&target) {
            Some(e) if e.is_directory() => {}
            Some(_) => return Err(FsError::NotADirectory { path: target }),
            None => return Err(FsError::NotFound { path: target }),
        }
        if !recursive && self.entries.keys().any(|k| is_descendant(k, &target)) {
            return Err(FsError::NotEmpty { path: target });
        }

        let mut staged = self.entries.clone();
        staged.retain(|k, _| k != &target && !is_descendant(k, &target));
        let cwd = if self.cwd == target || is_descendant(&self.cwd, &target) {
            parent(&target).to_string()
        } else {
            self.cwd.clone()
        };
        self.commit(staged, cwd)
    }

    /// Destination for a copy or move: into `dst` when it is a directory.
    fn destination(&self, src: &str, dst: &str) -> Result<String, FsError> {
        let target = self.resolve(dst)?;
        Ok(match self.lookup(&target) {
            Some(e) if e.is_directory() => join(&target, file_name(src)),
            _ => target,
        })
    }

    /// Copy a file: read the source, then write the destination.
    /// Returns the canonical destination.
    pub fn copy_file(&mut self, src: &str, dst: &str) -> Result<String, FsError> {
        let source = self.resolve(src)?;
        let content = self.read_file(&source)?;
        let dest = self.destination(&source, dst)?;
        if dest == source {
            return Err(FsError::InvalidPath {
                path: dest,
                reason: "source and destination are the same file".to_string(),
            });
        }
        self.write_file(&dest, &content, false)?;
        Ok(dest)
    }

    /// Move a file or directory tree. The removal and the insertion commit
    /// as one snapshot, so a failure can never leave both copies behind.
    /// Returns the canonical destination.
    pub fn move_file(&mut self, src: &str, dst: &str) -> Result<String, FsError> {
        let source = self.resolve(src)?;
        if source == "/" {
            return Err(FsError::InvalidPath {
                path: source,
                reason: "cannot move root".to_string(),
            });
        }
        let moving_dir = match self.lookup(&source) {
            Some(e) => e.is_directory(),
            None => return Err(FsError::NotFound { path: source }),
        };
        let dest = self.destination(&source, dst)?;
        if dest == source {
            return Ok(dest);
        }
        if is_descendant(&dest, &source) {
            return Err(FsError::InvalidPath {
                path: dest,
                reason: "cannot move a directory into itself".to_string(),
            });
        }
        match self.lookup(&dest) {
            Some(e) if e.is_directory() => return Err(FsError::AlreadyExists { path: dest }),
            Some(_) if moving_dir => return Err(FsError::NotADirectory { path: dest }),
            _ => {}
        }

        let now = now_ms();
        let mut staged = self.entries.clone();
        let moved: Vec<(String, Entry)> = staged
            .iter()
            .filter(|(k, _)| *k == &source || is_descendant(k, &source))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        staged.retain(|k, _| k != &source && !is_descendant(k, &source));
        self.ensure_parents(&mut staged, &dest, now)?;
        for (key, mut entry) in moved {
            let new_key = format!("{}{}", dest, &key[source.len()..]);
            self.check_depth(&new_key)?;
            if new_key.len() > self.options.limits.max_path_length {
                return Err(FsError::InvalidPath {
                    path: new_key,
                    reason: format!("longer than {} bytes", self.options.limits.max_path_length),
                });
            }
            if key == source {
                entry.modified = now;
            }
            staged.insert(new_key, entry);
        }

        let cwd = if self.cwd == source || is_descendant(&self.cwd, &source) {
            format!("{}{}", dest, &self.cwd[source.len()..])
        } else {
            self.cwd.clone()
        };
        self.commit(staged, cwd)?;
        Ok(dest)
    }

    /// Change the working directory. Returns the new canonical directory.
    pub fn change_directory(&mut self, path: &str) -> Result<String, FsError> {
        let target = self.resolve(path)?;
        match self.lookup(&target) {
            Some(e) if e.is_directory() => {}
            Some(_) => return Err(FsError::NotADirectory { path: target }),
            None => return Err(FsError::NotFound { path: target }),
        }
        let entries = std::mem::take(&mut self.entries);
        let saved = self.persist(&entries, &target);
        self.entries = entries;
        saved?;
        self.cwd = target.clone();
        Ok(target)
    }
}

fn decode_snapshot(blob: &str) -> Result<Snapshot, String> {
    let text = match codec::try_decompress(blob) {
        Ok(Some(text)) => text,
        Ok(None) => blob.to_string(),
        Err(e) => return Err(format!("codec: {}", e)),
    };
    let snapshot: Snapshot = serde_json::from_str(&text).map_err(|e| format!("json: {}", e))?;

    // every ancestor of a key must be a directory
    let files: HashSet<&str> = snapshot
        .file_system
        .iter()
        .filter(|(_, entry)| entry.is_file())
        .map(|(key, _)| key.as_str())
        .collect();
    for (key, _) in &snapshot.file_system {
        if let Some(file) = ancestors(key).into_iter().find(|a| files.contains(a.as_str())) {
            return Err(format!("'{}' lies under the file '{}'", key, file));
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryStore;

    fn fresh() -> (Vfs, MemoryStore) {
        fresh_with(Limits::default(), true)
    }

    fn fresh_with(limits: Limits, compress: bool) -> (Vfs, MemoryStore) {
        let store = MemoryStore::default();
        let vfs = Vfs::open(
            Box::new(store.clone()),
            VfsOptions {
                limits,
                compress,
                ..Default::default()
            },
        );
        (vfs, store)
    }

    #[test]
    fn test_default_layout() {
        let (vfs, store) = fresh();
        assert_eq!(vfs.cwd(), "/home/guest");
        assert!(vfs.is_directory("/tmp"));
        assert!(vfs.is_directory("/"));
        assert!(vfs.read_file("/etc/hostname").unwrap().starts_with("portfolio"));
        assert!(codec::is_compressed(&store.blob().unwrap()));
    }

    #[test]
    fn test_containment() {
        let (mut vfs, _) = fresh();
        vfs.write_file("/a/b/c.txt", "x", false).unwrap();

        let listing = vfs.list_directory("/a/b").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "c.txt");
        assert_eq!(listing[0].kind, EntryKind::File);
        assert_eq!(listing[0].size, 1);

        let listing = vfs.list_directory("/a").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "b");
        assert!(listing[0].is_directory());
    }

    #[test]
    fn test_write_preserves_created() {
        let (mut vfs, _) = fresh();
        vfs.write_file("/tmp/f", "one", false).unwrap();
        let before = vfs.stat("/tmp/f").unwrap();
        vfs.write_file("/tmp/f", "-two", true).unwrap();
        let after = vfs.stat("/tmp/f").unwrap();
        assert_eq!(after.created, before.created);
        assert!(after.modified >= before.modified);
        assert_eq!(after.content(), "one-two");
        assert_eq!(after.size(), 7);
    }

    #[test]
    fn test_file_size_quota_leaves_store_unchanged() {
        let limits = Limits {
            max_file_size: 8,
            ..Default::default()
        };
        let (mut vfs, store) = fresh_with(limits, true);
        let before = vfs.snapshot();
        let blob_before = store.blob();

        let err = vfs.write_file("/tmp/big.txt", "123456789", false).unwrap_err();
        assert!(matches!(err, FsError::QuotaExceeded(Quota::FileSize { size: 9, limit: 8 })));
        assert_eq!(vfs.snapshot(), before);
        assert_eq!(store.blob(), blob_before);
    }

    #[test]
    fn test_append_counts_toward_file_size() {
        let limits = Limits {
            max_file_size: 4,
            ..Default::default()
        };
        let (mut vfs, _) = fresh_with(limits, true);
        vfs.write_file("/tmp/f", "abc", false).unwrap();
        assert!(matches!(
            vfs.write_file("/tmp/f", "de", true),
            Err(FsError::QuotaExceeded(Quota::FileSize { .. }))
        ));
        assert_eq!(vfs.read_file("/tmp/f").unwrap(), "abc");
    }

    #[test]
    fn test_entry_count_quota() {
        let (vfs, _) = fresh();
        let limits = Limits {
            max_entries: vfs.entry_count() + 1,
            ..Default::default()
        };
        let (mut vfs, _) = fresh_with(limits, true);
        vfs.write_file("/tmp/one", "", false).unwrap();
        let err = vfs.write_file("/tmp/two", "", false).unwrap_err();
        assert!(matches!(err, FsError::QuotaExceeded(Quota::EntryCount { .. })));
        assert!(!vfs.exists("/tmp/two"));
    }

    #[test]
    fn test_snapshot_byte_quota() {
        let store = MemoryStore::new(2000);
        let mut vfs = Vfs::open(
            Box::new(store.clone()),
            VfsOptions {
                compress: false,
                ..Default::default()
            },
        );
        let budget = vfs.snapshot_budget();
        assert_eq!(budget, 1800);
        let before = vfs.snapshot();
        let err = vfs.write_file("/tmp/blob", &"z".repeat(1900), false).unwrap_err();
        assert!(matches!(err, FsError::QuotaExceeded(Quota::SnapshotBytes { .. })));
        assert_eq!(vfs.snapshot(), before);
    }

    #[test]
    fn test_mkdir_recursive() {
        let (mut vfs, _) = fresh();
        vfs.create_directory("/x/y/z", true).unwrap();
        for p in ["/x", "/x/y", "/x/y/z"] {
            assert!(vfs.is_directory(p), "{} should be a directory", p);
        }
        vfs.create_directory("/x/y/z", true).unwrap();
    }

    #[test]
    fn test_mkdir_errors() {
        let (mut vfs, _) = fresh();
        assert!(matches!(
            vfs.create_directory("/no/such/parent", false),
            Err(FsError::NotFound { path }) if path == "/no/such"
        ));
        vfs.write_file("/tmp/file", "x", false).unwrap();
        assert!(matches!(
            vfs.create_directory("/tmp/file", true),
            Err(FsError::AlreadyExists { .. })
        ));
        assert!(matches!(
            vfs.create_directory("/tmp", false),
            Err(FsError::AlreadyExists { .. })
        ));
        assert!(matches!(
            vfs.create_directory("/tmp/file/sub", true),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_mkdir_depth_limit() {
        let limits = Limits {
            max_directory_depth: 3,
            ..Default::default()
        };
        let (mut vfs, _) = fresh_with(limits, true);
        vfs.create_directory("/a/b/c", true).unwrap();
        assert!(matches!(
            vfs.create_directory("/a/b/c/d", true),
            Err(FsError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_read_errors() {
        let (vfs, _) = fresh();
        assert!(matches!(vfs.read_file("/nope"), Err(FsError::NotFound { .. })));
        assert!(matches!(vfs.read_file("/tmp"), Err(FsError::NotAFile { .. })));
    }

    #[test]
    fn test_remove_directory() {
        let (mut vfs, _) = fresh();
        vfs.write_file("/d/f.txt", "x", false).unwrap();
        assert!(matches!(vfs.remove_directory("/d", false), Err(FsError::NotEmpty { .. })));
        vfs.delete_file("/d/f.txt").unwrap();
        vfs.remove_directory("/d", false).unwrap();
        assert!(!vfs.exists("/d"));

        vfs.write_file("/e/g/h.txt", "x", false).unwrap();
        vfs.remove_directory("/e", true).unwrap();
        assert!(!vfs.exists("/e/g/h.txt"));
        assert!(matches!(vfs.remove_directory("/", true), Err(FsError::InvalidPath { .. })));
    }

    #[test]
    fn test_delete_file_errors() {
        let (mut vfs, _) = fresh();
        assert!(matches!(vfs.delete_file("/missing"), Err(FsError::NotFound { .. })));
        assert!(matches!(vfs.delete_file("/tmp"), Err(FsError::NotAFile { .. })));
    }

    #[test]
    fn test_copy_and_move() {
        let (mut vfs, _) = fresh();
        vfs.write_file("/tmp/a.txt", "data", false).unwrap();
        assert_eq!(vfs.copy_file("/tmp/a.txt", "/tmp/b.txt").unwrap(), "/tmp/b.txt");
        assert_eq!(vfs.read_file("/tmp/b.txt").unwrap(), "data");

        vfs.create_directory("/tmp/dir", false).unwrap();
        assert_eq!(vfs.move_file("/tmp/b.txt", "/tmp/dir").unwrap(), "/tmp/dir/b.txt");
        assert!(!vfs.exists("/tmp/b.txt"));
        assert_eq!(vfs.read_file("/tmp/dir/b.txt").unwrap(), "data");

        assert!(matches!(vfs.copy_file("/tmp/dir", "/tmp/x"), Err(FsError::NotAFile { .. })));
        assert!(matches!(
            vfs.copy_file("/tmp/a.txt", "/tmp/a.txt"),
            Err(FsError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_move_directory_tree() {
        let (mut vfs, _) = fresh();
        vfs.write_file("/src/deep/f.txt", "x", false).unwrap();
        vfs.change_directory("/src/deep").unwrap();
        vfs.move_file("/src", "/dst").unwrap();
        assert!(!vfs.exists("/src"));
        assert_eq!(vfs.read_file("/dst/deep/f.txt").unwrap(), "x");
        assert_eq!(vfs.cwd(), "/dst/deep");
        assert!(matches!(vfs.move_file("/dst", "/dst/deep/x"), Err(FsError::InvalidPath { .. })));
    }

    #[test]
    fn test_move_respects_depth_limit() {
        let limits = Limits {
            max_directory_depth: 3,
            ..Default::default()
        };
        let (mut vfs, _) = fresh_with(limits, true);
        vfs.create_directory("/a/b/c", true).unwrap();
        vfs.create_directory("/x/y/z", true).unwrap();
        let before = vfs.snapshot();
        assert!(matches!(
            vfs.move_file("/x", "/a/b/c"),
            Err(FsError::InvalidPath { .. })
        ));
        assert_eq!(vfs.snapshot(), before);
        assert!(vfs.is_directory("/x/y/z"));
        assert!(!vfs.exists("/a/b/c/x"));
        vfs.move_file("/x/y/z", "/a/z").unwrap();
        assert!(vfs.is_directory("/a/z"));
    }

    #[test]
    fn test_change_directory() {
        let (mut vfs, store) = fresh();
        assert_eq!(vfs.change_directory("../..").unwrap(), "/");
        assert!(matches!(vfs.change_directory("/etc/motd"), Err(FsError::NotADirectory { .. })));
        assert!(matches!(vfs.change_directory("/nowhere"), Err(FsError::NotFound { .. })));
        assert_eq!(vfs.cwd(), "/");

        let reopened = Vfs::open(Box::new(store), VfsOptions::default());
        assert_eq!(reopened.cwd(), "/");
    }

    #[test]
    fn test_persistence_round_trip() {
        for compress in [true, false] {
            let (mut vfs, store) = fresh_with(Limits::default(), compress);
            vfs.write_file("notes/todo.txt", "ship it\n", false).unwrap();
            let snapshot = vfs.snapshot();

            let reopened = Vfs::open(Box::new(store.clone()), VfsOptions::default());
            assert_eq!(reopened.snapshot(), snapshot);
            assert_eq!(reopened.read_file("/home/guest/notes/todo.txt").unwrap(), "ship it\n");
            assert_eq!(codec::is_compressed(&store.blob().unwrap()), compress);
        }
    }

    #[test]
    fn test_snapshot_json_shape() {
        let (vfs, store) = fresh_with(Limits::default(), false);
        let value: serde_json::Value = serde_json::from_str(&store.blob().unwrap()).unwrap();
        assert_eq!(value["currentDirectory"], vfs.cwd());
        let first = &value["fileSystem"][0];
        assert_eq!(first[0], "/bin");
        assert_eq!(first[1]["kind"], "directory");
    }

    #[test]
    fn test_corrupt_snapshot_reinitializes() {
        let store = MemoryStore::with_blob(5 * 1024 * 1024, "{ this is not json");
        let vfs = Vfs::open(Box::new(store.clone()), VfsOptions::default());
        assert_eq!(vfs.cwd(), "/home/guest");
        assert!(vfs.exists("/etc/motd"));
        assert!(store.blob().unwrap().starts_with(codec::MARKER));
    }

    #[test]
    fn test_restore_repairs_missing_ancestors() {
        let blob = r#"{"fileSystem":[["/a/b/c.txt",{"kind":"file","content":"hi","size":99,"created":1,"modified":1,"permissions":"-rw-r--r--","owner":"guest","group":"guest"}]],"currentDirectory":"/missing"}"#;
        let store = MemoryStore::with_blob(1024 * 1024, blob);
        let vfs = Vfs::open(Box::new(store), VfsOptions::default());
        assert!(vfs.is_directory("/a/b"));
        assert_eq!(vfs.stat("/a/b/c.txt").unwrap().size(), 2);
        assert_eq!(vfs.cwd(), "/");
    }

    #[test]
    fn test_snapshot_with_file_ancestor_is_discarded() {
        let blob = r#"{"fileSystem":[["/a",{"kind":"file","content":"x","size":1,"created":1,"modified":1,"permissions":"-rw-r--r--","owner":"guest","group":"guest"}],["/a/b.txt",{"kind":"file","content":"y","size":1,"created":1,"modified":1,"permissions":"-rw-r--r--","owner":"guest","group":"guest"}]],"currentDirectory":"/"}"#;
        let store = MemoryStore::with_blob(1024 * 1024, blob);
        let vfs = Vfs::open(Box::new(store), VfsOptions::default());
        assert!(!vfs.exists("/a"));
        assert!(vfs.exists("/etc/motd"));
        assert_eq!(vfs.cwd(), "/home/guest");
    }

    #[test]
    fn test_path_length_counts_the_resolved_path() {
        let limits = Limits {
            max_path_length: 16,
            ..Default::default()
        };
        let (mut vfs, _) = fresh_with(limits, true);
        vfs.create_directory("/aaaaa/bbbbb", true).unwrap();
        vfs.change_directory("/aaaaa/bbbbb").unwrap();
        // "cccc" is short, "/aaaaa/bbbbb/cccc" is 17 bytes
        assert!(matches!(vfs.write_file("cccc", "", false), Err(FsError::InvalidPath { .. })));
        vfs.write_file("ccc", "", false).unwrap();
        assert!(vfs.exists("/aaaaa/bbbbb/ccc"));
    }

    #[test]
    fn test_path_length_limit() {
        let limits = Limits {
            max_path_length: 16,
            ..Default::default()
        };
        let (mut vfs, _) = fresh_with(limits, true);
        assert!(matches!(
            vfs.write_file(&"/x".repeat(20), "", false),
            Err(FsError::InvalidPath { .. })
        ));
    }
}
