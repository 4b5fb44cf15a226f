//! Key-value storage backend.
//!
//! The persistence gateway talks to a `KvStore` trait rather than the
//! filesystem directly, so tests can run against a temp directory and the
//! backend can change without touching gateway logic. The production
//! implementation keeps one JSON file per collection key and writes
//! atomically (temp file + rename) so an interrupted write never corrupts a
//! collection.

use crate::error::{EntrenoError, Result};
use crate::storage::StorageConfig;
use fs_err as fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// The storage contract the gateway needs: string values under string keys.
pub trait KvStore {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Removes every stored key.
    fn clear(&self) -> Result<()>;
}

/// File-backed store: one file per key under `StorageConfig::data_dir()`.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    config: StorageConfig,
}

impl FileKvStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn ensure_data_dir(&self) -> Result<()> {
        let dir = self.config.data_dir();
        fs::create_dir_all(&dir).map_err(|e| EntrenoError::Io {
            context: format!("creating directory: {}", dir.display()),
            source: e,
        })
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.config.collection_file(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| EntrenoError::Io {
            context: format!("reading {}", path.display()),
            source: e,
        })?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_data_dir()?;
        atomic_write(&self.config.collection_file(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.config.collection_file(key);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| EntrenoError::Io {
            context: format!("removing {}", path.display()),
            source: e,
        })
    }

    fn clear(&self) -> Result<()> {
        let dir = self.config.data_dir();
        if !dir.exists() {
            return Ok(());
        }
        let entries = fs::read_dir(&dir).map_err(|e| EntrenoError::Io {
            context: format!("listing {}", dir.display()),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| EntrenoError::Io {
                context: format!("listing {}", dir.display()),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(&path).map_err(|e| EntrenoError::Io {
                    context: format!("removing {}", path.display()),
                    source: e,
                })?;
            }
        }
        Ok(())
    }
}

/// Writes content to a file atomically using temp file + rename.
///
/// The rename operation is atomic on the same filesystem, so readers never
/// observe a half-written collection.
fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| EntrenoError::Io {
        context: format!("creating temp file in {}", dir.display()),
        source: e,
    })?;

    tmp.write_all(contents.as_bytes())
        .map_err(|e| EntrenoError::Io {
            context: format!("writing temp file for {}", path.display()),
            source: e,
        })?;

    tmp.flush().map_err(|e| EntrenoError::Io {
        context: format!("flushing temp file for {}", path.display()),
        source: e,
    })?;

    tmp.persist(path).map_err(|e| EntrenoError::Io {
        context: format!("persisting temp file to {}", path.display()),
        source: e.error,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileKvStore) {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::new(StorageConfig::with_root(dir.path().to_path_buf()));
        (dir, store)
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get("sessions").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let (_dir, store) = temp_store();
        store.set("sessions", "[]").unwrap();
        assert_eq!(store.get("sessions").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_keys_with_spaces_and_accents() {
        let (_dir, store) = temp_store();
        store.set("exercise_Jalón al pecho", "[1]").unwrap();
        store.set("exercise_Jalon-al-pecho", "[2]").unwrap();
        assert_eq!(
            store.get("exercise_Jalón al pecho").unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(
            store.get("exercise_Jalon-al-pecho").unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = temp_store();
        store.set("routines", "[]").unwrap();
        store.remove("routines").unwrap();
        store.remove("routines").unwrap();
        assert_eq!(store.get("routines").unwrap(), None);
    }

    #[test]
    fn test_clear_wipes_every_key() {
        let (_dir, store) = temp_store();
        store.set("sessions", "[]").unwrap();
        store.set("bodyWeights", "[]").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("sessions").unwrap(), None);
        assert_eq!(store.get("bodyWeights").unwrap(), None);
    }
}
