//! Sound system error types.
//!
//! Sound is a best-effort collaborator: these errors are logged by the
//! daemon and never interrupt the session.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file could not be opened.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create an output sink.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// The audio thread has too many pending sounds.
    #[error("audio queue is full")]
    QueueFull,

    /// The audio thread is no longer running.
    #[error("audio thread stopped")]
    WorkerStopped,

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotAvailable(_) | Self::StreamError(_) | Self::WorkerStopped
        )
    }

    /// Returns true if playback should fall back to the built-in tone.
    #[must_use]
    pub fn should_fallback_to_tone(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }
}
