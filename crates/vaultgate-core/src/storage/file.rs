use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;

use super::SessionStorage;

/// Session file name in the storage directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    entries: BTreeMap<String, String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Storage backed by a small JSON file.
///
/// Every operation re-reads the file, so separate processes pointed at the
/// same directory see one shared session. The file is deleted once its last
/// entry is removed. Reads of a corrupt file fail; writes replace it.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SessionFile, StorageError> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load for modification. A corrupt file is replaced rather than
    /// blocking every later write; the flag reports whether that happened.
    fn load_for_write(&self) -> Result<(SessionFile, bool), StorageError> {
        match self.load() {
            Ok(file) => Ok((file, false)),
            Err(StorageError::Serialization(e)) => {
                warn!(path = ?self.path, error = %e, "Discarding corrupt session file");
                Ok((SessionFile::default(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, mut file: SessionFile) -> Result<(), StorageError> {
        if file.entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
                debug!(path = ?self.path, "Session file removed");
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        file.updated_at = Some(Utc::now());
        let contents = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut file, _) = self.load_for_write()?;
        file.entries.insert(key.to_owned(), value.to_owned());
        self.save(file)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let (mut file, corrupt) = self.load_for_write()?;
        if file.entries.remove(key).is_none() && !corrupt {
            return Ok(());
        }
        self.save(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("vault_authenticated", "true").unwrap();
        storage.set("vault_auth_timestamp", "1700000000000").unwrap();

        let reopened = FileStorage::new(dir.path());
        assert_eq!(
            reopened.get("vault_authenticated").unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            reopened.get("vault_auth_timestamp").unwrap().as_deref(),
            Some("1700000000000")
        );
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("not-created-yet"));
        assert_eq!(storage.get("anything").unwrap(), None);
        storage.remove("anything").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_removing_last_entry_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        storage.remove("a").unwrap();
        assert!(storage.path().exists());

        storage.remove("b").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), "{ not json").unwrap();

        assert!(matches!(
            storage.get("vault_authenticated"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), "{ not json").unwrap();

        storage.set("vault_authenticated", "true").unwrap();
        assert_eq!(
            storage.get("vault_authenticated").unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_remove_deletes_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), "{ not json").unwrap();

        storage.remove("vault_authenticated").unwrap();
        assert!(!storage.path().exists());
        assert_eq!(storage.get("vault_authenticated").unwrap(), None);
    }
}
