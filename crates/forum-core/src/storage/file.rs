use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::LocalStorage;

/// String entries kept in memory and written through to a JSON file on every
/// mutation.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file, starting empty when it does not exist yet.
    ///
    /// A file that does not parse is moved aside to `<name>.corrupt` and the
    /// storage starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Storage file is corrupt, starting empty");
                    set_aside(&path);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened local storage");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write storage file {}", self.path.display()))?;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

fn set_aside(path: &Path) {
    let target = corrupt_path(path);
    if let Err(e) = std::fs::rename(path, &target) {
        warn!(path = %path.display(), error = %e, "Failed to move corrupt storage file aside");
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("token", "t-123").unwrap();
        storage.set_item("userInfo", r#"{"id":1}"#).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("t-123"));
        assert_eq!(
            reopened.get_item("userInfo").unwrap().as_deref(),
            Some(r#"{"id":1}"#)
        );
    }

    #[test]
    fn test_remove_is_written_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("token", "t-123").unwrap();
        storage.remove_item("token").unwrap();
        storage.remove_item("never-set").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("token").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"token": "abc""#).unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("storage.json.corrupt")).unwrap(),
            r#"{"token": "abc""#
        );

        storage.set_item("token", "t-456").unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("t-456"));
    }

    #[test]
    fn test_wrong_shape_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"token": 42}"#).unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);
    }
}
