//! Sound source resolution.
//!
//! Alerts are looked up by id in a user sounds directory. An alert with no
//! matching file plays a built-in tone instead.

use std::path::{Path, PathBuf};

use crate::types::AlertSound;

/// Supported audio file extensions, in lookup order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// The alert id (e.g., "alarm-work-end").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// A synthesized tone.
    Tone {
        /// The alert id.
        name: String,
        /// Frequency in hertz.
        frequency: f32,
    },
}

impl SoundSource {
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn tone(name: impl Into<String>, frequency: f32) -> Self {
        Self::Tone {
            name: name.into(),
            frequency,
        }
    }

    /// Built-in tone for an alert.
    ///
    /// Work end rings higher than break end so the two are distinguishable.
    #[must_use]
    pub fn fallback_for(sound: AlertSound) -> Self {
        let frequency = match sound {
            AlertSound::WorkEnd => 880.0,
            AlertSound::BreakEnd => 660.0,
        };
        Self::tone(sound.id(), frequency)
    }

    /// Returns the alert id this source plays.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Tone { name, .. } => name,
        }
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}

/// Maps alert ids to playable sources.
#[derive(Debug, Clone, Default)]
pub struct SoundLibrary {
    dir: Option<PathBuf>,
}

impl SoundLibrary {
    /// Creates a library that looks for `<id>.<ext>` in `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Creates a library that only plays built-in tones.
    #[must_use]
    pub fn tones_only() -> Self {
        Self { dir: None }
    }

    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolves an alert to a file if one exists, else its built-in tone.
    #[must_use]
    pub fn resolve(&self, sound: AlertSound) -> SoundSource {
        self.find_file(sound.id())
            .map(|path| SoundSource::file(sound.id(), path))
            .unwrap_or_else(|| SoundSource::fallback_for(sound))
    }

    fn find_file(&self, id: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{id}.{ext}")))
            .find(|path| path.is_file())
    }
}
