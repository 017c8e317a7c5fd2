//! Error types for preference storage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Preference storage error type.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Failed to read the preference file.
    #[error("Failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the preference file.
    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The preference file is not a flat JSON object of strings.
    #[error("Malformed preference file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize preferences.
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for preference operations.
pub type Result<T> = std::result::Result<T, PreferenceError>;
