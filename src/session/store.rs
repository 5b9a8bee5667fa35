//! Persisted bearer token slot

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Error;

/// One key-value slot holding the session token.
///
/// Absence of a token means logged out. Implementations must tolerate
/// concurrent access from the session manager and the embedder.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any
    fn load(&self) -> Result<Option<String>, Error>;

    /// Persist the token
    fn save(&self, token: &str) -> Result<(), Error>;

    /// Remove the persisted token
    fn clear(&self) -> Result<(), Error>;
}

/// Token slot backed by a single file
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store persisting to the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::store(err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(Error::store)?;
        }
        fs::write(&self.path, token).map_err(Error::store)
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::store(err)),
        }
    }
}

/// In-memory token slot for tests and embedders with their own persistence
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a token
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, Error> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        *self.slot.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_a_token() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_a_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session-token"));

        assert_eq!(store.load().unwrap(), None);

        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session-token"));

        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn file_store_treats_a_blank_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-token");
        fs::write(&path, "  \n").unwrap();

        let store = FileTokenStore::new(path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session-token"));

        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok".to_string()));
    }
}
