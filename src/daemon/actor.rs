//! Single-owner actor around the session engine.
//!
//! Every mutation (user commands and ticks) goes through one task, so no two
//! state changes ever overlap. The actor also keeps the tick subscription in
//! step with the session: whenever `is_running` or the mode changes it tears
//! the subscription down and, if the session is running, starts a new one.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::types::{ConfigError, SessionConfig, SessionMode, SessionSnapshot};

use super::engine::SessionEngine;
use super::ticker::{TickSignal, Ticker};

// ============================================================================
// SessionCommand
// ============================================================================

/// Requests accepted by the actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Start or pause the countdown
    Toggle {
        /// Reply with the resulting session
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Return to a fresh work interval
    Reset {
        /// Reply with the resulting session
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Replace the configuration
    Apply {
        /// New configuration
        config: SessionConfig,
        /// Reply with the resulting session or the rejection
        reply: oneshot::Sender<Result<SessionSnapshot, ConfigError>>,
    },
    /// Read the session without changing it
    Status {
        /// Reply with the current session
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Errors returned by [`SessionHandle`] calls.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The actor task has stopped
    #[error("session actor is not running")]
    Closed,

    /// The configuration was rejected
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

// ============================================================================
// SessionHandle
// ============================================================================

/// Cloneable front door to a running [`SessionActor`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    /// Starts or pauses the countdown.
    pub async fn toggle(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Toggle { reply }).await
    }

    /// Resets the session.
    pub async fn reset(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Reset { reply }).await
    }

    /// Applies a new configuration.
    pub async fn apply(&self, config: SessionConfig) -> Result<SessionSnapshot, SessionError> {
        let result = self
            .request(|reply| SessionCommand::Apply { config, reply })
            .await?;
        Ok(result?)
    }

    /// Returns the current session.
    pub async fn status(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Status { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }
}

// ============================================================================
// SessionActor
// ============================================================================

/// Owns the engine and the tick subscription.
pub struct SessionActor {
    engine: SessionEngine,
    ticker: Ticker,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    tick_rx: mpsc::UnboundedReceiver<TickSignal>,
}

impl SessionActor {
    /// Creates an actor and the handle used to reach it.
    pub fn new(engine: SessionEngine) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();

        let actor = Self {
            engine,
            ticker: Ticker::new(tick_tx),
            command_rx,
            tick_rx,
        };
        (actor, SessionHandle { command_tx })
    }

    /// Spawns the actor on the current runtime.
    pub fn spawn(engine: SessionEngine) -> (JoinHandle<()>, SessionHandle) {
        let (actor, handle) = Self::new(engine);
        (tokio::spawn(actor.run()), handle)
    }

    /// Processes commands and ticks until every handle is dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(signal) = self.tick_rx.recv() => self.handle_tick(signal),
            }
        }

        self.ticker.unsubscribe();
        debug!("Session actor stopped");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let before = self.watch_key();

        match command {
            SessionCommand::Toggle { reply } => {
                self.engine.toggle_running();
                self.sync_ticker(before);
                let _ = reply.send(self.engine.snapshot());
            }
            SessionCommand::Reset { reply } => {
                self.engine.reset();
                self.sync_ticker(before);
                let _ = reply.send(self.engine.snapshot());
            }
            SessionCommand::Apply { config, reply } => {
                let result = self
                    .engine
                    .apply_config(config)
                    .map(|()| self.engine.snapshot());
                self.sync_ticker(before);
                let _ = reply.send(result);
            }
            SessionCommand::Status { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
        }
    }

    fn handle_tick(&mut self, signal: TickSignal) {
        if !self.ticker.is_current(signal) {
            trace!(generation = signal.generation, "Dropping stale tick");
            return;
        }

        let before = self.watch_key();
        self.engine.tick();
        self.sync_ticker(before);
    }

    fn watch_key(&self) -> (bool, SessionMode) {
        let state = self.engine.get_state();
        (state.is_running, state.mode)
    }

    fn sync_ticker(&mut self, before: (bool, SessionMode)) {
        let after = self.watch_key();
        let (running, _) = after;

        if !running {
            self.ticker.unsubscribe();
        } else if after != before || !self.ticker.is_subscribed() {
            self.ticker.subscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::engine::SessionEvent;
    use tokio::time::Duration;

    fn spawn_actor(
        config: SessionConfig,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = SessionEngine::new(config, tx).unwrap();
        let (_task, handle) = SessionActor::spawn(engine);
        (handle, rx)
    }

    fn short_config() -> SessionConfig {
        SessionConfig {
            work_duration: 3,
            break_duration: 2,
            long_break_duration: 5,
            cycle_threshold: 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_initial_session() {
        let (handle, _rx) = spawn_actor(short_config());

        let snapshot = handle.status().await.unwrap();

        assert_eq!(snapshot.mode, SessionMode::Work);
        assert_eq!(snapshot.seconds_left, 3);
        assert!(!snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_session_counts_down() {
        let (handle, _rx) = spawn_actor(SessionConfig::default());

        handle.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let snapshot = handle.status().await.unwrap();
        assert!(snapshot.is_running);
        assert!(
            (1496..=1498).contains(&snapshot.seconds_left),
            "Expected ~3 ticks, got {} left",
            snapshot.seconds_left
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_session_does_not_count() {
        let (handle, _rx) = spawn_actor(SessionConfig::default());

        handle.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let paused = handle.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let snapshot = handle.status().await.unwrap();
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.seconds_left, paused.seconds_left);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_completes_and_pauses() {
        let (handle, mut rx) = spawn_actor(short_config());

        handle.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let snapshot = handle.status().await.unwrap();
        assert_eq!(snapshot.mode, SessionMode::Break);
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.cycles_completed, 1);
        assert_eq!(snapshot.seconds_left, 2);

        let mut notified = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SessionEvent::Notify { .. }) {
                notified = true;
            }
        }
        assert!(notified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_countdown() {
        let (handle, _rx) = spawn_actor(SessionConfig::default());

        handle.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let snapshot = handle.reset().await.unwrap();
        assert_eq!(snapshot.seconds_left, 1500);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let snapshot = handle.status().await.unwrap();
        assert_eq!(snapshot.seconds_left, 1500);
        assert!(!snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_rejects_invalid_config() {
        let (handle, _rx) = spawn_actor(short_config());

        let result = handle.apply(short_config().with_break_duration(0)).await;

        assert!(matches!(result, Err(SessionError::InvalidConfig(_))));
        assert_eq!(handle.status().await.unwrap().config, short_config());
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_stops_running_session() {
        let (handle, _rx) = spawn_actor(SessionConfig::default());

        handle.toggle().await.unwrap();
        let snapshot = handle
            .apply(SessionConfig::default().with_work_duration(600))
            .await
            .unwrap();

        assert!(!snapshot.is_running);
        assert_eq!(snapshot.seconds_left, 600);
        assert_eq!(snapshot.total_session_time, 600);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let engine = SessionEngine::new(SessionConfig::default(), tx).unwrap();
        let (actor, handle) = SessionActor::new(engine);
        drop(actor);

        assert!(matches!(handle.status().await, Err(SessionError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_queued_before_pause_is_dropped_after_resume() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let engine = SessionEngine::new(SessionConfig::default(), tx).unwrap();
        let (mut actor, _handle) = SessionActor::new(engine);

        let toggle = |actor: &mut SessionActor| {
            let (reply, _) = oneshot::channel();
            actor.handle_command(SessionCommand::Toggle { reply });
        };

        // Start, and let one tick land in the queue without consuming it.
        toggle(&mut actor);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Pause and resume before the actor sees the queued tick.
        toggle(&mut actor);
        toggle(&mut actor);
        assert!(actor.engine.get_state().is_running);

        let queued = actor.tick_rx.try_recv().unwrap();
        assert_eq!(queued.generation, 1);
        assert_eq!(actor.ticker.generation(), 2);

        actor.handle_tick(queued);
        assert_eq!(actor.engine.get_state().seconds_left, 1500);

        // The live subscription still counts.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let fresh = actor.tick_rx.try_recv().unwrap();
        actor.handle_tick(fresh);
        assert_eq!(actor.engine.get_state().seconds_left, 1499);
    }
}
