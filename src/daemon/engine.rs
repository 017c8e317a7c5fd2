//! Session engine for the Pomodoro timer.
//!
//! This module provides the core session state machine:
//! - Countdown progression, one call per elapsed second
//! - Work → Break → Work transitions, pausing at every boundary
//! - Long break selection after a configurable number of cycles
//! - Side-effect requests (notify, play sound) emitted as events

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::types::{
    AlertSound, ConfigError, SessionConfig, SessionMode, SessionSnapshot, SessionState,
};

/// Notification text when a work interval ends.
pub const WORK_COMPLETE_MESSAGE: &str = "Work session complete! Time for a break.";

/// Notification text when a break interval ends.
pub const BREAK_COMPLETE_MESSAGE: &str = "Break over! Time to focus again.";

// ============================================================================
// SessionEvent
// ============================================================================

/// Events emitted by the engine for collaborators and observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Countdown started or resumed
    Started {
        /// Interval that is now running
        mode: SessionMode,
    },
    /// Countdown paused by the user
    Paused,
    /// One second elapsed
    Tick {
        /// Remaining seconds
        seconds_left: u32,
    },
    /// An interval reached zero
    IntervalCompleted {
        /// Interval that just finished
        finished: SessionMode,
        /// Completed work cycles after the transition
        cycles_completed: u32,
    },
    /// Request to show a desktop notification
    Notify {
        /// Message body
        message: String,
    },
    /// Request to play an alert
    PlaySound {
        /// Alert to play
        sound: AlertSound,
    },
    /// Session returned to its initial state
    Reset,
    /// A new configuration was applied
    ConfigApplied,
}

/// Result of feeding one tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was paused; the tick was dropped
    Ignored,
    /// One second was counted down
    Counted,
    /// The interval completed and the engine paused
    Completed,
}

// ============================================================================
// SessionEngine
// ============================================================================

/// Owns the session configuration and state.
pub struct SessionEngine {
    /// Active configuration
    config: SessionConfig,
    /// Live timer state
    state: SessionState,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionEngine {
    /// Creates a paused engine at the start of a work interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: SessionConfig,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SessionState::new(&config);
        Ok(Self {
            config,
            state,
            event_tx,
        })
    }

    /// Advances the countdown by one second.
    ///
    /// A tick at zero completes the interval instead of counting further.
    /// Ticks while paused are dropped.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            trace!("Dropping tick while paused");
            return TickOutcome::Ignored;
        }

        if self.state.seconds_left == 0 {
            self.complete_interval();
            return TickOutcome::Completed;
        }

        self.state.seconds_left -= 1;
        self.emit(SessionEvent::Tick {
            seconds_left: self.state.seconds_left,
        });
        TickOutcome::Counted
    }

    /// Finishes the current interval and switches mode.
    ///
    /// The session pauses at every boundary; the next interval waits for
    /// an explicit start.
    pub fn complete_interval(&mut self) {
        self.state.is_running = false;
        let finished = self.state.mode;

        let (message, sound) = match finished {
            SessionMode::Work => {
                self.state.cycles_completed += 1;
                (WORK_COMPLETE_MESSAGE, AlertSound::WorkEnd)
            }
            SessionMode::Break => (BREAK_COMPLETE_MESSAGE, AlertSound::BreakEnd),
        };

        self.state.mode = finished.next();
        self.state.reconcile(&self.config);

        info!(
            finished = finished.as_str(),
            cycles = self.state.cycles_completed,
            next_duration = self.state.total_session_time,
            "Interval completed"
        );

        self.emit(SessionEvent::IntervalCompleted {
            finished,
            cycles_completed: self.state.cycles_completed,
        });
        self.emit(SessionEvent::Notify {
            message: message.to_string(),
        });
        self.emit(SessionEvent::PlaySound { sound });
    }

    /// Starts a paused countdown or pauses a running one.
    ///
    /// Starting at zero completes the pending interval first, so the
    /// countdown never resumes from an exhausted interval.
    pub fn toggle_running(&mut self) {
        if !self.state.is_running && self.state.seconds_left == 0 {
            self.complete_interval();
        }

        self.state.is_running = !self.state.is_running;

        if self.state.is_running {
            debug!(mode = self.state.mode.as_str(), "Countdown started");
            self.emit(SessionEvent::Started {
                mode: self.state.mode,
            });
        } else {
            debug!(seconds_left = self.state.seconds_left, "Countdown paused");
            self.emit(SessionEvent::Paused);
        }
    }

    /// Returns to a paused work interval with no completed cycles.
    pub fn reset(&mut self) {
        self.state = SessionState::new(&self.config);
        debug!("Session reset");
        self.emit(SessionEvent::Reset);
    }

    /// Replaces the configuration.
    ///
    /// The timer stops unconditionally, completed cycles are cleared and the
    /// current interval restarts with the new durations.
    ///
    /// # Errors
    ///
    /// Returns an error (leaving the session untouched) if the configuration
    /// is invalid.
    pub fn apply_config(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        config.validate()?;

        self.state.is_running = false;
        self.config = config;
        self.state.cycles_completed = 0;
        self.state.reconcile(&self.config);

        debug!(config = ?self.config, "Configuration applied");
        self.emit(SessionEvent::ConfigApplied);
        Ok(())
    }

    /// Percentage of the current interval already elapsed.
    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent()
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        self.state.format_remaining()
    }

    /// Returns a reference to the current session state.
    pub fn get_state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Captures a serializable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state, &self.config)
    }

    /// Returns a mutable reference to the session state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Session event dropped, no listener: {:?}", e.0);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_config() -> SessionConfig {
        SessionConfig {
            work_duration: 1500,
            break_duration: 300,
            long_break_duration: 900,
            cycle_threshold: 4,
        }
    }

    fn create_engine() -> (SessionEngine, mpsc::UnboundedReceiver<SessionEvent>) {
        create_engine_with_config(scenario_config())
    }

    fn create_engine_with_config(
        config: SessionConfig,
    ) -> (SessionEngine, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = SessionEngine::new(config, tx).unwrap();
        (engine, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Ticks until the running interval completes, returning the tick count.
    fn run_to_completion(engine: &mut SessionEngine) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            match engine.tick() {
                TickOutcome::Completed => return ticks,
                TickOutcome::Counted => {}
                TickOutcome::Ignored => panic!("engine was not running"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Construction Tests
    // ------------------------------------------------------------------------

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let (engine, _rx) = create_engine();
            let state = engine.get_state();

            assert_eq!(state.mode, SessionMode::Work);
            assert_eq!(state.seconds_left, 1500);
            assert_eq!(state.total_session_time, 1500);
            assert_eq!(state.cycles_completed, 0);
            assert!(!state.is_running);
        }

        #[test]
        fn test_new_rejects_invalid_config() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let result = SessionEngine::new(SessionConfig::default().with_cycle_threshold(0), tx);
            assert_eq!(result.err(), Some(ConfigError::ZeroCycleThreshold));
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_decrements_by_one() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            drain(&mut rx);

            assert_eq!(engine.tick(), TickOutcome::Counted);

            let state = engine.get_state();
            assert_eq!(state.seconds_left, 1499);
            assert_eq!(state.mode, SessionMode::Work);
            assert!(state.is_running);
            assert_eq!(
                rx.try_recv().unwrap(),
                SessionEvent::Tick { seconds_left: 1499 }
            );
        }

        #[test]
        fn test_tick_while_paused_is_dropped() {
            let (mut engine, mut rx) = create_engine();

            assert_eq!(engine.tick(), TickOutcome::Ignored);

            assert_eq!(engine.get_state().seconds_left, 1500);
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn test_tick_reaching_zero_does_not_complete() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();
            engine.get_state_mut().seconds_left = 1;

            assert_eq!(engine.tick(), TickOutcome::Counted);

            let state = engine.get_state();
            assert_eq!(state.seconds_left, 0);
            assert_eq!(state.mode, SessionMode::Work);
            assert!(state.is_running);
        }

        #[test]
        fn test_tick_at_zero_completes_interval() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();
            engine.get_state_mut().seconds_left = 0;

            assert_eq!(engine.tick(), TickOutcome::Completed);

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Break);
            assert!(!state.is_running);
            assert_eq!(state.seconds_left, 300);
        }

        #[test]
        fn test_interval_takes_duration_plus_one_ticks() {
            let config = scenario_config().with_work_duration(3);
            let (mut engine, _rx) = create_engine_with_config(config);
            engine.toggle_running();

            assert_eq!(run_to_completion(&mut engine), 4);
        }
    }

    // ------------------------------------------------------------------------
    // Completion Tests
    // ------------------------------------------------------------------------

    mod completion_tests {
        use super::*;

        #[test]
        fn test_work_completion_events() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            drain(&mut rx);

            engine.complete_interval();

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Break);
            assert_eq!(state.cycles_completed, 1);
            assert!(!state.is_running);
            assert_eq!(state.total_session_time, 300);
            assert_eq!(state.seconds_left, 300);

            assert_eq!(
                drain(&mut rx),
                vec![
                    SessionEvent::IntervalCompleted {
                        finished: SessionMode::Work,
                        cycles_completed: 1,
                    },
                    SessionEvent::Notify {
                        message: WORK_COMPLETE_MESSAGE.to_string(),
                    },
                    SessionEvent::PlaySound {
                        sound: AlertSound::WorkEnd,
                    },
                ]
            );
        }

        #[test]
        fn test_break_completion_keeps_cycle_count() {
            let (mut engine, mut rx) = create_engine();
            engine.complete_interval();
            drain(&mut rx);

            engine.complete_interval();

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Work);
            assert_eq!(state.cycles_completed, 1);
            assert_eq!(state.seconds_left, 1500);

            assert_eq!(
                drain(&mut rx),
                vec![
                    SessionEvent::IntervalCompleted {
                        finished: SessionMode::Break,
                        cycles_completed: 1,
                    },
                    SessionEvent::Notify {
                        message: BREAK_COMPLETE_MESSAGE.to_string(),
                    },
                    SessionEvent::PlaySound {
                        sound: AlertSound::BreakEnd,
                    },
                ]
            );
        }

        #[test]
        fn test_long_break_after_four_cycles() {
            let (mut engine, _rx) = create_engine();

            for cycle in 1..=4 {
                engine.toggle_running();
                run_to_completion(&mut engine);
                assert_eq!(engine.get_state().mode, SessionMode::Break);
                assert_eq!(engine.get_state().cycles_completed, cycle);

                if cycle < 4 {
                    assert_eq!(engine.get_state().total_session_time, 300);
                    engine.toggle_running();
                    run_to_completion(&mut engine);
                    assert_eq!(engine.get_state().mode, SessionMode::Work);
                }
            }

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Break);
            assert_eq!(state.total_session_time, 900);
            assert_eq!(state.cycles_completed, 4);
        }

        #[test]
        fn test_long_break_at_multiples_of_threshold() {
            let (mut engine, _rx) = create_engine();

            for count in [4, 8, 12] {
                engine.get_state_mut().mode = SessionMode::Work;
                engine.get_state_mut().cycles_completed = count - 1;

                engine.complete_interval();

                assert_eq!(
                    engine.get_state().total_session_time,
                    900,
                    "Expected long break at cycle count {}",
                    count
                );
            }
        }

        #[test]
        fn test_short_break_between_multiples() {
            let (mut engine, _rx) = create_engine();

            for count in [1, 2, 3, 5, 6, 7] {
                engine.get_state_mut().mode = SessionMode::Work;
                engine.get_state_mut().cycles_completed = count - 1;

                engine.complete_interval();

                assert_eq!(
                    engine.get_state().total_session_time,
                    300,
                    "Expected short break at cycle count {}",
                    count
                );
            }
        }

        #[test]
        fn test_completion_survives_closed_event_channel() {
            let (mut engine, rx) = create_engine();
            drop(rx);

            engine.toggle_running();
            engine.complete_interval();

            assert_eq!(engine.get_state().mode, SessionMode::Break);
            assert_eq!(engine.get_state().cycles_completed, 1);
        }
    }

    // ------------------------------------------------------------------------
    // Toggle Tests
    // ------------------------------------------------------------------------

    mod toggle_tests {
        use super::*;

        #[test]
        fn test_toggle_starts_and_pauses() {
            let (mut engine, mut rx) = create_engine();

            engine.toggle_running();
            assert!(engine.get_state().is_running);
            assert_eq!(
                rx.try_recv().unwrap(),
                SessionEvent::Started {
                    mode: SessionMode::Work
                }
            );

            engine.toggle_running();
            assert!(!engine.get_state().is_running);
            assert_eq!(rx.try_recv().unwrap(), SessionEvent::Paused);
        }

        #[test]
        fn test_toggle_preserves_remaining_time() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();
            engine.get_state_mut().seconds_left = 500;

            engine.toggle_running();
            engine.toggle_running();

            assert_eq!(engine.get_state().seconds_left, 500);
            assert_eq!(engine.get_state().mode, SessionMode::Work);
        }

        #[test]
        fn test_start_at_zero_completes_first() {
            let (mut engine, mut rx) = create_engine();
            engine.get_state_mut().seconds_left = 0;

            engine.toggle_running();

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Break);
            assert_eq!(state.cycles_completed, 1);
            assert_eq!(state.seconds_left, 300);
            assert!(state.is_running);

            let events = drain(&mut rx);
            assert!(events.contains(&SessionEvent::PlaySound {
                sound: AlertSound::WorkEnd
            }));
            assert_eq!(
                events.last(),
                Some(&SessionEvent::Started {
                    mode: SessionMode::Break
                })
            );
        }
    }

    // ------------------------------------------------------------------------
    // Reset and Apply Tests
    // ------------------------------------------------------------------------

    mod reset_apply_tests {
        use super::*;

        #[test]
        fn test_reset_from_mid_session() {
            let (mut engine, mut rx) = create_engine();
            engine.complete_interval();
            engine.complete_interval();
            engine.complete_interval();
            engine.toggle_running();
            engine.tick();
            drain(&mut rx);

            engine.reset();

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Work);
            assert_eq!(state.seconds_left, 1500);
            assert_eq!(state.total_session_time, 1500);
            assert_eq!(state.cycles_completed, 0);
            assert!(!state.is_running);
            assert_eq!(rx.try_recv().unwrap(), SessionEvent::Reset);
        }

        #[test]
        fn test_apply_mid_break() {
            let (mut engine, mut rx) = create_engine();
            engine.complete_interval();
            engine.toggle_running();
            engine.tick();
            drain(&mut rx);

            let config = scenario_config().with_break_duration(420);
            engine.apply_config(config.clone()).unwrap();

            let state = engine.get_state();
            assert_eq!(state.mode, SessionMode::Break);
            assert_eq!(state.seconds_left, 420);
            assert_eq!(state.total_session_time, 420);
            assert_eq!(state.cycles_completed, 0);
            assert!(!state.is_running);
            assert_eq!(engine.config(), &config);
            assert_eq!(rx.try_recv().unwrap(), SessionEvent::ConfigApplied);
        }

        #[test]
        fn test_apply_forfeits_long_break() {
            let (mut engine, _rx) = create_engine();
            engine.get_state_mut().cycles_completed = 3;
            engine.complete_interval();
            assert_eq!(engine.get_state().total_session_time, 900);

            engine.apply_config(scenario_config()).unwrap();

            assert_eq!(engine.get_state().mode, SessionMode::Break);
            assert_eq!(engine.get_state().total_session_time, 300);
        }

        #[test]
        fn test_apply_rejects_invalid_config() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            engine.tick();
            drain(&mut rx);

            let result = engine.apply_config(scenario_config().with_work_duration(0));

            assert!(result.is_err());
            let state = engine.get_state();
            assert!(state.is_running);
            assert_eq!(state.seconds_left, 1499);
            assert_eq!(engine.config(), &scenario_config());
            assert!(rx.try_recv().is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Derived Value Tests
    // ------------------------------------------------------------------------

    mod derived_tests {
        use super::*;

        #[test]
        fn test_progress_and_format() {
            let (mut engine, _rx) = create_engine();
            assert_eq!(engine.progress_percent(), 0.0);
            assert_eq!(engine.format_remaining(), "25:00");

            engine.get_state_mut().seconds_left = 125;
            assert_eq!(engine.format_remaining(), "02:05");
            assert!(engine.progress_percent() > 90.0);

            engine.get_state_mut().seconds_left = 0;
            assert_eq!(engine.progress_percent(), 100.0);
        }

        #[test]
        fn test_snapshot() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.mode, SessionMode::Work);
            assert!(snapshot.is_running);
            assert_eq!(snapshot.remaining, "25:00");
            assert_eq!(snapshot.config, scenario_config());
        }
    }
}
