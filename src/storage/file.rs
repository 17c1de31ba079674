use std::fs;
use std::io;
use std::path::PathBuf;

use super::{KeyValueStorage, StorageError, validate_key};

/// One JSON file per slot inside a data directory.
///
/// Writes go to a sibling temp file which is then renamed over the slot,
/// so a failed write never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota: None,
        }
    }

    pub fn with_quota(mut self, bytes: Option<usize>) -> Self {
        self.quota = bytes;
        self
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.json.tmp", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match fs::read_to_string(self.slot_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    quota,
                });
            }
        }

        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(io_err)?;
        let tmp = self.temp_path(key);
        if let Err(e) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        fs::rename(&tmp, self.slot_path(key)).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            io_err(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("lodestar-data").unwrap(), None);

        storage.set("lodestar-data", "{\"taskList\":[]}").unwrap();
        assert_eq!(
            storage.get("lodestar-data").unwrap().as_deref(),
            Some("{\"taskList\":[]}")
        );
        assert!(storage.slot_path("lodestar-data").exists());
        assert!(!dir.path().join(".lodestar-data.json.tmp").exists());
    }

    #[test]
    fn set_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("slot", "first").unwrap();
        storage.set("slot", "second").unwrap();
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn creates_missing_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut storage = FileStorage::new(&nested);
        storage.set("slot", "value").unwrap();
        assert!(nested.join("slot.json").exists());
    }

    #[test]
    fn quota_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).with_quota(Some(4));
        storage.set("slot", "ok").unwrap();
        assert!(matches!(
            storage.set("slot", "too large"),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(storage.get("slot").unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
