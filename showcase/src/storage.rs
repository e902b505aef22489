//! Persisted session token.
//!
//! The token lives under a single key in a local key/value store. The file
//! backend mirrors browser local storage: one JSON object of string values.

use crate::error::StorageError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key the token is stored under by default
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Durable storage for the session token
pub trait TokenStorage: Send + Sync {
    /// Reads the persisted token, if any
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persists the token, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Removes the persisted token
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Token storage backed by a JSON file of key/value pairs
///
/// Other keys in the file are preserved.
#[derive(Clone, Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    key: String,
}

impl FileTokenStorage {
    /// Stores the token under [`DEFAULT_TOKEN_KEY`] in `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    /// Uses a different key inside the file
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    /// Entries to update before a write
    ///
    /// A corrupt file is reset to empty so the token can still be written.
    fn entries_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt(error)) => {
                self.log_reset(&error);
                Ok(BTreeMap::new())
            },
            other => other,
        }
    }

    fn log_reset(&self, error: &serde_json::Error) {
        tracing::warn!(
            path = %self.path.display(),
            %error,
            "Token storage file is corrupt, resetting it"
        );
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_update()?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), StorageError> {
        match self.read_entries() {
            Ok(mut entries) => {
                if entries.remove(&self.key).is_some() {
                    self.write_entries(&entries)?;
                }
                Ok(())
            },
            Err(StorageError::Corrupt(error)) => {
                self.log_reset(&error);
                self.write_entries(&BTreeMap::new())
            },
            Err(error) => Err(error),
        }
    }
}

/// Token storage held in memory
///
/// Clones share the same slot, so a test can keep one handle and inspect
/// what the store persisted.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTokenStorage {
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryTokenStorage {
    /// Creates empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that already holds `token`
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.lock().map_err(|_| StorageError::Poisoned)?.clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }
}
