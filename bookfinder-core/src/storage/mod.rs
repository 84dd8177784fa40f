//! Local key-value storage for persisted application state
//!
//! Values are opaque strings addressed by a single key, the way a browser's
//! local storage holds one serialized snapshot per key. Access is synchronous;
//! there is one writer per storage root.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Whether a value is stored under `key`
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Filesystem-backed store keeping one `<key>.json` file per key
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file, rejecting keys that would escape the root
    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => {
                let mut file_name = name.to_os_string();
                file_name.push(".json");
                Ok(self.root.join(file_name))
            }
            _ => Err(StorageError::BackendError(format!(
                "Invalid storage key: {:?}",
                key
            ))),
        }
    }
}

fn map_io_error(err: std::io::Error, path: &Path) -> StorageError {
    match err.kind() {
        std::io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        std::io::ErrorKind::PermissionDenied => {
            StorageError::PermissionDenied(path.display().to_string())
        }
        _ => StorageError::BackendError(format!("{}: {}", path.display(), err)),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(e, &path)),
        }
    }

    /// Writes to a temp file then renames so readers never see a partial value
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root).map_err(|e| map_io_error(e, &self.root))?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).map_err(|e| map_io_error(e, &temp_path))?;
        std::fs::rename(&temp_path, &path).map_err(|e| map_io_error(e, &path))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(e, &path)),
        }
    }
}

/// In-memory store (for testing), optionally limited to a byte quota
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes whose value exceeds `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            data: RwLock::default(),
            quota: Some(bytes),
        }
    }

    fn lock_error() -> StorageError {
        StorageError::BackendError("memory store lock poisoned".to_string())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self.data.read().map_err(|_| Self::lock_error())?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }
        let mut data = self.data.write().map_err(|_| Self::lock_error())?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut data = self.data.write().map_err(|_| Self::lock_error())?;
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();

        store.set("favoriteBooks", "[]").unwrap();
        assert_eq!(store.get("favoriteBooks").unwrap().as_deref(), Some("[]"));
        assert!(store.contains("favoriteBooks").unwrap());
        assert!(!store.contains("missing").unwrap());

        store.remove("favoriteBooks").unwrap();
        assert_eq!(store.get("favoriteBooks").unwrap(), None);
        // Removing again is fine
        store.remove("favoriteBooks").unwrap();
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(4);
        store.set("k", "1234").unwrap();
        let err = store.set("k", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 5,
                limit: 4
            }
        ));
        // Previous value survives a rejected write
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("data");

        let store = FileStore::new(&root);
        assert_eq!(store.get("favoriteBooks").unwrap(), None);
        store.set("favoriteBooks", "[1,2]").unwrap();
        assert!(root.join("favoriteBooks.json").exists());
        assert!(!root.join("favoriteBooks.json.tmp").exists());

        let reopened = FileStore::new(&root);
        assert_eq!(
            reopened.get("favoriteBooks").unwrap().as_deref(),
            Some("[1,2]")
        );

        reopened.remove("favoriteBooks").unwrap();
        assert!(!root.join("favoriteBooks.json").exists());
        reopened.remove("favoriteBooks").unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        for key in ["../escape", "a/b", "/abs", "", "."] {
            assert!(store.set(key, "x").is_err(), "key {:?} accepted", key);
        }
    }
}
