//! Daemon module for the session timer.
//!
//! This module contains the long-running side of the tool:
//! - `engine`: session state machine
//! - `ticker`: resubscribable 1 Hz tick source
//! - `actor`: single owner of the engine, fed by commands and ticks
//! - `effects`: notifications and sounds requested by the engine
//! - `ipc`: Unix socket server for CLI clients

pub mod actor;
pub mod effects;
pub mod engine;
pub mod ipc;
pub mod ticker;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::notification::{DesktopNotifier, Notifier};
use crate::sound::{try_spawn_worker, SoundLibrary, SoundPlayer};
use crate::types::SessionConfig;

pub use actor::{SessionActor, SessionCommand, SessionError, SessionHandle};
pub use effects::EffectDispatcher;
pub use engine::{SessionEngine, SessionEvent, TickOutcome};
pub use ipc::{IpcError, IpcServer, RequestHandler};
pub use ticker::{TickSignal, Ticker};

/// Everything needed to start a daemon.
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    /// Unix socket to listen on
    pub socket_path: PathBuf,
    /// Initial session configuration
    pub config: SessionConfig,
    /// Directory searched for custom alert sounds
    pub sounds_dir: Option<PathBuf>,
    /// Play alert sounds at interval boundaries
    pub sound_enabled: bool,
    /// Show desktop notifications at interval boundaries
    pub notifications_enabled: bool,
}

/// Handles to the running session pieces.
pub struct Session {
    pub handle: SessionHandle,
    actor: tokio::task::JoinHandle<()>,
    effects: tokio::task::JoinHandle<()>,
}

impl Session {
    /// Wires the engine, actor and effect dispatcher together.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn start(
        config: SessionConfig,
        notifier: Arc<dyn Notifier>,
        sound: Option<Arc<dyn SoundPlayer>>,
        library: SoundLibrary,
    ) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let engine = SessionEngine::new(config, event_tx).context("Invalid session configuration")?;

        let (actor, handle) = SessionActor::spawn(engine);
        let dispatcher = EffectDispatcher::new(notifier, sound, library);
        let effects = tokio::spawn(dispatcher.run(event_rx));

        Ok(Self {
            handle,
            actor,
            effects,
        })
    }

    /// Drops the last handle and waits for both tasks to finish.
    pub async fn shutdown(self) {
        drop(self.handle);
        if let Err(e) = self.actor.await {
            warn!("Session actor ended abnormally: {}", e);
        }
        if let Err(e) = self.effects.await {
            warn!("Effect dispatcher ended abnormally: {}", e);
        }
    }
}

/// Runs the daemon until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the socket cannot
/// be bound.
pub async fn run(options: DaemonOptions) -> Result<()> {
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new(options.notifications_enabled));

    let sound: Option<Arc<dyn SoundPlayer>> = if options.sound_enabled {
        try_spawn_worker().map(|worker| Arc::new(worker) as Arc<dyn SoundPlayer>)
    } else {
        debug!("Sound disabled by option");
        None
    };

    let library = match &options.sounds_dir {
        Some(dir) => SoundLibrary::new(dir),
        None => SoundLibrary::tones_only(),
    };

    let session = Session::start(options.config.clone(), notifier, sound, library)?;
    let server = IpcServer::new(&options.socket_path)?;
    let handler = RequestHandler::new(session.handle.clone());

    info!("Daemon listening on {}", server.socket_path().display());

    let outcome = serve(&server, handler).await;

    drop(server);
    session.shutdown().await;
    info!("Daemon stopped");
    outcome
}

/// Accepts connections until Ctrl-C, serving each on its own task.
async fn serve(server: &IpcServer, handler: RequestHandler) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for shutdown signal")?;
                info!("Shutdown requested");
                return Ok(());
            }
            accepted = server.accept() => match accepted {
                Ok(stream) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.serve_connection(stream).await {
                            warn!("Failed to answer client: {:#}", e);
                        }
                    });
                }
                Err(e) => warn!("{:#}", e),
            },
        }
    }
}
