//! Persisted key/value settings
//!
//! The config service stores two keys, the active adapter name and its
//! configuration. [`FileSettingsStore`] keeps them in one JSON object on disk;
//! [`MemorySettingsStore`] keeps them in memory for tests and one-shot runs.

use crate::domain::{EmrLinkError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Durable key/value storage for persisted settings
pub trait SettingsStore: Send + Sync {
    /// Value stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Store every entry in one write; on error none of them is stored
    fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<()>;

    /// Delete `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Settings held in memory only
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.extend(entries.into_iter().map(|(key, value)| (key.to_string(), value)));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Settings kept in a JSON object file
///
/// Every write rewrites the whole file through a sibling temp file and a
/// rename.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    /// Store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(EmrLinkError::Storage(format!(
                    "Failed to read settings file {}: {e}",
                    self.path.display()
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(EmrLinkError::Storage(format!(
                "Settings file {} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(EmrLinkError::Storage(format!(
                "Settings file {} is not valid JSON: {e}",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                EmrLinkError::Storage(format!(
                    "Failed to create settings directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let content = serde_json::to_string_pretty(values)?;
        fs::write(&temp_path, content).map_err(|e| {
            EmrLinkError::Storage(format!(
                "Failed to write settings file {}: {e}",
                temp_path.display()
            ))
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            EmrLinkError::Storage(format!(
                "Failed to replace settings file {}: {e}",
                self.path.display()
            ))
        })?;

        tracing::debug!(path = %self.path.display(), keys = values.len(), "Wrote settings file");
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut Map<String, Value>)) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        change(&mut values);
        self.write_all(&values)
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.update(|values| {
            values.insert(key.to_string(), value);
        })
    }

    fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<()> {
        self.update(|values| {
            for (key, value) in entries {
                values.insert(key.to_string(), value);
            }
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|values| {
            values.remove(key);
        })
    }
}
