//! Turns engine events into collaborator calls.
//!
//! The engine only emits requests; this task carries them out. Any failure
//! here is logged and forgotten, the session never hears about it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::notification::{Delivery, NotificationError, Notifier};
use crate::sound::{SoundLibrary, SoundPlayer};
use crate::types::AlertSound;

use super::engine::SessionEvent;

/// Drives the notifier and sound player from the engine's event stream.
pub struct EffectDispatcher {
    notifier: Arc<dyn Notifier>,
    sound: Option<Arc<dyn SoundPlayer>>,
    library: SoundLibrary,
}

impl EffectDispatcher {
    /// Creates a dispatcher. `sound` is `None` when audio is off.
    pub fn new(
        notifier: Arc<dyn Notifier>,
        sound: Option<Arc<dyn SoundPlayer>>,
        library: SoundLibrary,
    ) -> Self {
        Self {
            notifier,
            sound,
            library,
        }
    }

    /// Handles events until the engine side of the channel closes.
    ///
    /// Notifications run on the blocking pool without holding up later
    /// events; the ones still in flight are awaited before returning.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        let mut pending = JoinSet::new();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event, &mut pending),
                    None => break,
                },
                Some(joined) = pending.join_next(), if !pending.is_empty() => {
                    log_delivery(joined);
                }
            }
        }

        while let Some(joined) = pending.join_next().await {
            log_delivery(joined);
        }
        debug!("Effect dispatcher stopped");
    }

    fn handle(&self, event: SessionEvent, pending: &mut JoinSet<NotifyResult>) {
        match event {
            SessionEvent::Notify { message } => {
                // Desktop notification calls may block on D-Bus.
                let notifier = Arc::clone(&self.notifier);
                pending.spawn_blocking(move || notifier.notify(&message));
            }
            SessionEvent::PlaySound { sound } => self.play(sound),
            SessionEvent::IntervalCompleted {
                finished,
                cycles_completed,
            } => {
                info!(
                    cycles_completed,
                    "{} interval complete",
                    finished.as_str()
                );
            }
            other => debug!("Session event: {:?}", other),
        }
    }

    fn play(&self, sound: AlertSound) {
        let Some(player) = &self.sound else {
            debug!("Sound disabled, skipping {}", sound.id());
            return;
        };

        let source = self.library.resolve(sound);
        match player.play(&source) {
            Ok(()) => debug!("Queued {}", source.name()),
            Err(e) if e.is_device_error() => {
                warn!("Audio unavailable, {} not played: {}", sound.id(), e)
            }
            Err(e) => warn!("Failed to play {}: {}", sound.id(), e),
        }
    }
}

type NotifyResult = Result<Delivery, NotificationError>;

fn log_delivery(joined: Result<NotifyResult, JoinError>) {
    match joined {
        Ok(Ok(Delivery::Shown)) => debug!("Notification shown"),
        Ok(Ok(Delivery::Dropped)) => debug!("Notification dropped, permission not granted"),
        Ok(Err(e)) => warn!("Failed to show notification: {} ({})", e, e.suggestion()),
        Err(e) => warn!("Notification task failed: {}", e),
    }
}
