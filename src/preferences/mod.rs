//! Persistent user preferences.
//!
//! Preferences are a flat string map. The only key in use today is the
//! color theme, see [`Theme`].

pub mod error;
mod theme;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

pub use error::PreferenceError;
pub use theme::{Theme, THEME_KEY};

/// A key/value store that survives restarts.
pub trait PreferenceStore {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&mut self, key: &str, value: &str) -> error::Result<()>;
}

// ============================================================================
// JsonPreferenceStore
// ============================================================================

/// Preference store backed by a JSON object on disk.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonPreferenceStore {
    /// Loads the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> error::Result<Self> {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                PreferenceError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PreferenceError::Read { path, source }),
        };

        debug!("Loaded {} preference(s) from {}", values.len(), path.display());
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> error::Result<()> {
        let write_err = |source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(values).map_err(PreferenceError::Serialize)?;

        // Readers only ever see a complete file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Writes the updated map first; memory only changes once disk has.
    fn set(&mut self, key: &str, value: &str) -> error::Result<()> {
        let mut next = self.values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        self.values = next;
        Ok(())
    }
}

// ============================================================================
// MemoryPreferenceStore
// ============================================================================

/// In-memory preference store for testing.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> error::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
