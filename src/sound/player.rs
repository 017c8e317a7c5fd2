//! Sound player implementation using rodio.
//!
//! `RodioSoundPlayer` holds the output stream, which is not `Send`; it is
//! meant to live on the audio thread owned by [`super::SoundWorker`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// Length of the built-in tone.
const TONE_DURATION: Duration = Duration::from_millis(600);

/// Volume of the built-in tone.
const TONE_AMPLITUDE: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; each sound is appended to a detached sink and
/// keeps playing after `play` returns, as long as the player is alive.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a sound from the given source.
    ///
    /// A file that cannot be opened or decoded falls back to the source's
    /// built-in tone.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink could be created.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { name, path } => {
                debug!("Playing sound file: {}", path.display());
                match self.play_file(path) {
                    Err(e) if e.should_fallback_to_tone() => {
                        warn!("Failed to play '{}': {}, falling back to tone", name, e);
                        self.play_tone(fallback_frequency(name))
                    }
                    result => result,
                }
            }
            SoundSource::Tone { name, frequency } => {
                debug!("Playing tone for {}", name);
                self.play_tone(*frequency)
            }
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    fn play_tone(&self, frequency: f32) -> Result<(), SoundError> {
        let tone = SineWave::new(frequency)
            .take_duration(TONE_DURATION)
            .amplify(TONE_AMPLITUDE);

        let sink = self.sink()?;
        sink.append(tone);
        sink.detach();
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Tone used when a named file fails to play.
fn fallback_frequency(name: &str) -> f32 {
    crate::types::AlertSound::all()
        .into_iter()
        .find(|sound| sound.id() == name)
        .map(SoundSource::fallback_for)
        .and_then(|source| match source {
            SoundSource::Tone { frequency, .. } => Some(frequency),
            SoundSource::File { .. } => None,
        })
        .unwrap_or(440.0)
}
