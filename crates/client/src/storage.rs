//! Local key-value storage.
//!
//! The client keeps exactly two pieces of state across runs: the bearer token
//! and the theme preference. Both live as plain strings in one JSON object on
//! disk. There is no TTL and no encryption.
//!
//! File-backed storage re-reads the file on every access, so several processes
//! sharing a file see each other's writes. Writes replace the file atomically
//! through a temporary file in the same directory, so a reader never sees a
//! half-written store. Concurrent writers are last-write-wins per key.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Storage keys.
pub mod keys {
    /// Key for the bearer token issued at login.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the light/dark theme preference.
    pub const THEME: &str = "theme";
}

/// Errors that can occur when reading or writing the storage file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

type Entries = BTreeMap<String, String>;

/// String key-value store shared by every component of one process.
///
/// Cheap to clone; clones share the same backing store.
#[derive(Clone)]
pub struct LocalStorage {
    backend: Arc<Backend>,
}

enum Backend {
    Memory(RwLock<Entries>),
    File {
        path: PathBuf,
        // Serializes read-modify-write cycles within this process.
        write_lock: Mutex<()>,
    },
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.backend.as_ref() {
            Backend::Memory(_) => f.write_str("LocalStorage(memory)"),
            Backend::File { path, .. } => write!(f, "LocalStorage({})", path.display()),
        }
    }
}

impl LocalStorage {
    /// Storage that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(RwLock::new(Entries::new()))),
        }
    }

    /// Storage persisted to `path`.
    ///
    /// The file is created on first write. An existing file is validated now
    /// so a corrupt file is reported at startup rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing file cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        debug!(path = %path.display(), keys = entries.len(), "Opened local storage");

        Ok(Self {
            backend: Arc::new(Backend::File {
                path,
                write_lock: Mutex::new(()),
            }),
        })
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self.backend.as_ref() {
            Backend::Memory(_) => None,
            Backend::File { path, .. } => Some(path),
        }
    }

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing file cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.backend.as_ref() {
            Backend::Memory(entries) => Ok(entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()),
            Backend::File { path, .. } => Ok(read_entries(path)?.remove(key)),
        }
    }

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing file cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing file cannot be written.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        match self.backend.as_ref() {
            Backend::Memory(entries) => {
                apply(&mut entries.write().unwrap_or_else(PoisonError::into_inner));
                Ok(())
            }
            Backend::File { path, write_lock } => {
                let _guard = write_lock.lock().unwrap_or_else(PoisonError::into_inner);
                let mut entries = read_entries(path)?;
                apply(&mut entries);
                write_entries(path, &entries)
            }
        }
    }
}

/// Read the storage file. A missing file is an empty store.
fn read_entries(path: &Path) -> Result<Entries, StorageError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }

    serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the storage file, creating its directory if needed.
///
/// The new contents go to a temporary file that is then renamed over `path`.
fn write_entries(path: &Path, entries: &Entries) -> Result<(), StorageError> {
    let io_error = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(io_error)?;
            parent
        }
        _ => Path::new("."),
    };

    let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_memory_set_get_remove() {
        let storage = LocalStorage::in_memory();
        assert_eq!(storage.get(keys::THEME).unwrap(), None);

        storage.set(keys::THEME, "dark").unwrap();
        assert_eq!(storage.get(keys::THEME).unwrap().as_deref(), Some("dark"));

        storage.remove(keys::THEME).unwrap();
        assert_eq!(storage.get(keys::THEME).unwrap(), None);

        // Removing again is fine
        storage.remove(keys::THEME).unwrap();
    }

    #[test]
    fn test_clones_share_state() {
        let storage = LocalStorage::in_memory();
        let clone = storage.clone();
        clone.set(keys::ACCESS_TOKEN, "t1").unwrap();
        assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("t1"));
    }

    #[test]
    fn test_file_persists_across_handles() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");

        let first = LocalStorage::open(&path).unwrap();
        first.set(keys::ACCESS_TOKEN, "t1").unwrap();
        first.set(keys::THEME, "light").unwrap();

        let second = LocalStorage::open(&path).unwrap();
        assert_eq!(second.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("t1"));

        // A write through one handle is visible through the other
        second.remove(keys::ACCESS_TOKEN).unwrap();
        assert_eq!(first.get(keys::ACCESS_TOKEN).unwrap(), None);
        assert_eq!(first.get(keys::THEME).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");

        let storage = LocalStorage::open(&path).unwrap();
        assert_eq!(storage.get(keys::THEME).unwrap(), None);
        assert_eq!(storage.path(), Some(path.as_path()));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("storage.json");

        let storage = LocalStorage::open(&path).unwrap();
        storage.set(keys::THEME, "dark").unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");

        let storage = LocalStorage::open(&path).unwrap();
        storage.set(keys::ACCESS_TOKEN, "t1").unwrap();
        storage.set(keys::THEME, "dark").unwrap();
        storage.remove(keys::ACCESS_TOKEN).unwrap();

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);

        let on_disk: Entries =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.get(keys::THEME).map(String::as_str), Some("dark"));
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = LocalStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
