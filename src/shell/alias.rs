//! Aliases
//!
//! Name to expansion mappings, stored as a JSON object in a dotfile written
//! through the file system like any other file.

use indexmap::IndexMap;
use tracing::warn;

use super::env::is_valid_name;
use super::error::ShellError;
use crate::fs::{FsError, Vfs};

#[derive(Debug, Clone)]
pub struct Aliases {
    map: IndexMap<String, String>,
    path: String,
}

impl Aliases {
    /// Read the alias file at `path`. A missing file means no aliases; an
    /// unreadable one is logged and ignored.
    pub fn load(vfs: &Vfs, path: &str) -> Self {
        let map = match vfs.read_file(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("ignoring malformed alias file {}: {}", path, e);
                IndexMap::new()
            }),
            Err(FsError::NotFound { .. }) => IndexMap::new(),
            Err(e) => {
                warn!("cannot read alias file {}: {}", path, e);
                IndexMap::new()
            }
        };
        Self {
            map,
            path: path.to_string(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn save(vfs: &mut Vfs, path: &str, map: &IndexMap<String, String>) -> Result<(), ShellError> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| ShellError::Failed(format!("cannot encode aliases: {}", e)))?;
        vfs.write_file(path, &json, false)?;
        Ok(())
    }

    /// Define or replace an alias. The file is written before the in-memory
    /// table changes, so a rejected write leaves both as they were.
    pub fn set(&mut self, vfs: &mut Vfs, name: &str, value: &str) -> Result<(), ShellError> {
        if !is_valid_name(name) {
            return Err(ShellError::invalid(format!("'{}': invalid alias name", name)));
        }
        let mut staged = self.map.clone();
        staged.insert(name.to_string(), value.to_string());
        Self::save(vfs, &self.path, &staged)?;
        self.map = staged;
        Ok(())
    }

    /// Remove an alias. Returns false if it did not exist.
    pub fn remove(&mut self, vfs: &mut Vfs, name: &str) -> Result<bool, ShellError> {
        if !self.map.contains_key(name) {
            return Ok(false);
        }
        let mut staged = self.map.clone();
        staged.shift_remove(name);
        Self::save(vfs, &self.path, &staged)?;
        self.map = staged;
        Ok(true)
    }
}
