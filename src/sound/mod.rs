//! Alert sound playback.
//!
//! This module provides:
//!
//! - Resolution of alert ids to sound files, with a built-in tone fallback
//! - A rodio player running on a dedicated audio thread
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   resolve   ┌──────────────────┐
//! │  SoundLibrary    │────────────▶│   SoundSource    │
//! └──────────────────┘             │  File | Tone     │
//!                                  └────────┬─────────┘
//!                                           │ play
//!                                           ▼
//! ┌──────────────────┐  crossbeam  ┌──────────────────┐
//! │   SoundWorker    │────────────▶│ RodioSoundPlayer │
//! │  (SoundPlayer)   │   bounded   │  (audio thread)  │
//! └──────────────────┘             └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomoclock::sound::{SoundLibrary, SoundPlayer, SoundWorker};
//! use pomoclock::types::AlertSound;
//!
//! let worker = SoundWorker::spawn().expect("audio init");
//! let library = SoundLibrary::new("/home/me/.pomoclock/sounds");
//! worker.play(&library.resolve(AlertSound::WorkEnd)).expect("queue full");
//! ```

mod error;
mod player;
mod source;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::{SoundLibrary, SoundSource, SUPPORTED_EXTENSIONS};
pub use worker::{try_spawn_worker, SoundWorker, QUEUE_CAPACITY};

/// A "play named alert" capability.
pub trait SoundPlayer: Send + Sync {
    /// Starts playing a sound without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the sound could not be scheduled.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }

    /// Alert ids played so far, in order.
    #[must_use]
    pub fn played_names(&self) -> Vec<String> {
        self.play_calls
            .lock()
            .unwrap()
            .iter()
            .map(|source| source.name().to_string())
            .collect()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(source.clone());
        Ok(())
    }
}
