//! Dedicated audio thread.
//!
//! The rodio output stream cannot cross threads, so it is opened on its own
//! thread and fed through a bounded channel. Callers never wait on audio.

use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use super::error::SoundError;
use super::player::RodioSoundPlayer;
use super::source::SoundSource;
use super::SoundPlayer;

/// Maximum number of sounds waiting for the audio thread.
pub const QUEUE_CAPACITY: usize = 16;

/// Handle to the audio thread.
///
/// The thread exits once the worker is dropped and the queue drains.
#[derive(Debug, Clone)]
pub struct SoundWorker {
    tx: Sender<SoundSource>,
}

impl SoundWorker {
    /// Starts the audio thread and waits for the output device to open.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread could not start or no audio device
    /// is available.
    pub fn spawn() -> Result<Self, SoundError> {
        let (tx, rx) = bounded::<SoundSource>(QUEUE_CAPACITY);
        let (ready_tx, ready_rx) = bounded::<Result<(), SoundError>>(1);

        thread::Builder::new()
            .name("pomoclock-audio".to_string())
            .spawn(move || match RodioSoundPlayer::new() {
                Ok(player) => {
                    let _ = ready_tx.send(Ok(()));
                    run_audio_loop(&player, &rx);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| SoundError::PlaybackError(format!("failed to start audio thread: {e}")))?;

        ready_rx.recv().map_err(|_| SoundError::WorkerStopped)??;
        debug!("Audio thread started");

        Ok(Self { tx })
    }

    #[cfg(test)]
    fn detached(capacity: usize) -> (Self, Receiver<SoundSource>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl SoundPlayer for SoundWorker {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.tx.try_send(source.clone()).map_err(|e| match e {
            TrySendError::Full(_) => SoundError::QueueFull,
            TrySendError::Disconnected(_) => SoundError::WorkerStopped,
        })
    }
}

fn run_audio_loop(player: &RodioSoundPlayer, rx: &Receiver<SoundSource>) {
    for source in rx.iter() {
        if let Err(e) = player.play(&source) {
            warn!("Failed to play {}: {}", source.name(), e);
        }
    }
    debug!("Audio thread stopped");
}

/// Starts the audio thread, returning None if audio is unavailable.
#[must_use]
pub fn try_spawn_worker() -> Option<SoundWorker> {
    match SoundWorker::spawn() {
        Ok(worker) => Some(worker),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
