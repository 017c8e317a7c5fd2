//! Core data types for the Pomodoro session timer.
//!
//! This module defines the data structures used for:
//! - Session mode and configuration with validation
//! - Live session state and the duration reconcile rule
//! - Derived display values (remaining time, progress)
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// SessionMode
// ============================================================================

/// The kind of interval currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Focused work interval
    Work,
    /// Break interval (short or long)
    Break,
}

impl SessionMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Work => "work",
            SessionMode::Break => "break",
        }
    }

    /// Returns the heading shown above the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::Work => "Work Time",
            SessionMode::Break => "Break Time",
        }
    }

    /// Returns the mode that follows this one.
    pub fn next(&self) -> SessionMode {
        match self {
            SessionMode::Work => SessionMode::Break,
            SessionMode::Break => SessionMode::Work,
        }
    }
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Work
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Default work interval (25 minutes).
pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;

/// Default short break (5 minutes).
pub const DEFAULT_BREAK_SECONDS: u32 = 5 * 60;

/// Default long break (15 minutes).
pub const DEFAULT_LONG_BREAK_SECONDS: u32 = 15 * 60;

/// Default number of completed work cycles between long breaks.
pub const DEFAULT_CYCLE_THRESHOLD: u32 = 10;

/// Converts user-entered minutes to whole seconds, saturating on overflow.
pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Errors raised when a configuration cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration was zero.
    #[error("{0} must be a positive number of seconds")]
    NonPositiveDuration(&'static str),

    /// The long break cycle count was zero.
    #[error("long break cycle count must be at least 1")]
    ZeroCycleThreshold,
}

/// Durations and long-break cadence for a session.
///
/// All durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Work interval length
    pub work_duration: u32,
    /// Short break length
    pub break_duration: u32,
    /// Long break length
    pub long_break_duration: u32,
    /// Completed work cycles after which a break becomes a long break
    pub cycle_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_SECONDS,
            break_duration: DEFAULT_BREAK_SECONDS,
            long_break_duration: DEFAULT_LONG_BREAK_SECONDS,
            cycle_threshold: DEFAULT_CYCLE_THRESHOLD,
        }
    }
}

impl SessionConfig {
    /// Builds a configuration from minute values, as entered by a user.
    pub fn from_minutes(
        work_minutes: u32,
        break_minutes: u32,
        long_break_minutes: u32,
        cycle_threshold: u32,
    ) -> Self {
        Self {
            work_duration: minutes_to_seconds(work_minutes),
            break_duration: minutes_to_seconds(break_minutes),
            long_break_duration: minutes_to_seconds(long_break_minutes),
            cycle_threshold,
        }
    }

    /// Sets the work duration in seconds.
    pub fn with_work_duration(mut self, seconds: u32) -> Self {
        self.work_duration = seconds;
        self
    }

    /// Sets the short break duration in seconds.
    pub fn with_break_duration(mut self, seconds: u32) -> Self {
        self.break_duration = seconds;
        self
    }

    /// Sets the long break duration in seconds.
    pub fn with_long_break_duration(mut self, seconds: u32) -> Self {
        self.long_break_duration = seconds;
        self
    }

    /// Sets the long break cycle threshold.
    pub fn with_cycle_threshold(mut self, cycles: u32) -> Self {
        self.cycle_threshold = cycles;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero duration or a zero cycle threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_duration == 0 {
            return Err(ConfigError::NonPositiveDuration("work duration"));
        }
        if self.break_duration == 0 {
            return Err(ConfigError::NonPositiveDuration("break duration"));
        }
        if self.long_break_duration == 0 {
            return Err(ConfigError::NonPositiveDuration("long break duration"));
        }
        if self.cycle_threshold == 0 {
            return Err(ConfigError::ZeroCycleThreshold);
        }
        Ok(())
    }
}

// ============================================================================
// Duration selection and derived values
// ============================================================================

/// Returns true if the break following `cycles_completed` work cycles is a long one.
///
/// A zero threshold never yields a long break.
pub fn is_long_break(cycles_completed: u32, cycle_threshold: u32) -> bool {
    cycles_completed != 0 && cycles_completed.checked_rem(cycle_threshold) == Some(0)
}

/// Selects the interval length for a mode and cycle count.
pub fn select_duration(mode: SessionMode, cycles_completed: u32, config: &SessionConfig) -> u32 {
    match mode {
        SessionMode::Work => config.work_duration,
        SessionMode::Break if is_long_break(cycles_completed, config.cycle_threshold) => {
            config.long_break_duration
        }
        SessionMode::Break => config.break_duration,
    }
}

/// Formats seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so an hour reads `60:00`.
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Percentage of the interval already elapsed, in `[0, 100]`.
pub fn progress_percent(seconds_left: u32, total_session_time: u32) -> f64 {
    if total_session_time == 0 {
        return 0.0;
    }
    let remaining = f64::from(seconds_left) / f64::from(total_session_time);
    (100.0 * (1.0 - remaining)).clamp(0.0, 100.0)
}

// ============================================================================
// SessionState
// ============================================================================

/// The live timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current interval kind
    pub mode: SessionMode,
    /// Seconds until the current interval completes
    pub seconds_left: u32,
    /// Length the current interval started at
    pub total_session_time: u32,
    /// Completed work intervals
    pub cycles_completed: u32,
    /// Whether ticks advance the countdown
    pub is_running: bool,
}

impl SessionState {
    /// Creates the initial state: a paused work interval.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            mode: SessionMode::Work,
            seconds_left: config.work_duration,
            total_session_time: config.work_duration,
            cycles_completed: 0,
            is_running: false,
        }
    }

    /// Restarts the current interval at the length selected by
    /// `(mode, cycles_completed, config)`.
    ///
    /// Called after every operation that changes one of those inputs.
    pub fn reconcile(&mut self, config: &SessionConfig) {
        let duration = select_duration(self.mode, self.cycles_completed, config);
        self.total_session_time = duration;
        self.seconds_left = duration;
    }

    /// Returns true if the current interval is a long break.
    pub fn is_long_break(&self, config: &SessionConfig) -> bool {
        self.mode == SessionMode::Break && is_long_break(self.cycles_completed, config.cycle_threshold)
    }

    /// Percentage of the current interval already elapsed.
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.seconds_left, self.total_session_time)
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format_remaining(self.seconds_left)
    }
}

// ============================================================================
// AlertSound
// ============================================================================

/// Named alerts played at interval boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertSound {
    /// A work interval finished
    WorkEnd,
    /// A break interval finished
    BreakEnd,
}

impl AlertSound {
    /// Returns the alert identifier, also used as the sound file stem.
    pub fn id(&self) -> &'static str {
        match self {
            AlertSound::WorkEnd => "alarm-work-end",
            AlertSound::BreakEnd => "alarm-break-end",
        }
    }

    /// All alerts, in a stable order.
    pub fn all() -> [AlertSound; 2] {
        [AlertSound::WorkEnd, AlertSound::BreakEnd]
    }
}

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Read-only view of a session, as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Current interval kind
    pub mode: SessionMode,
    /// Seconds until the interval completes
    pub seconds_left: u32,
    /// Length the interval started at
    pub total_session_time: u32,
    /// Completed work intervals
    pub cycles_completed: u32,
    /// Whether the countdown is advancing
    pub is_running: bool,
    /// Whether the current interval is a long break
    pub long_break: bool,
    /// Remaining time as `MM:SS`
    pub remaining: String,
    /// Elapsed share of the interval, 0-100
    pub progress_percent: f64,
    /// Active configuration
    pub config: SessionConfig,
}

impl SessionSnapshot {
    /// Captures the derived view of `state` under `config`.
    pub fn capture(state: &SessionState, config: &SessionConfig) -> Self {
        Self {
            mode: state.mode,
            seconds_left: state.seconds_left,
            total_session_time: state.total_session_time,
            cycles_completed: state.cycles_completed,
            is_running: state.is_running,
            long_break: state.is_long_break(config),
            remaining: state.format_remaining(),
            progress_percent: state.progress_percent(),
            config: config.clone(),
        }
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start or pause the countdown
    Toggle,
    /// Return to a fresh, paused work interval
    Reset,
    /// Replace the session configuration
    Apply {
        /// New durations, in seconds
        #[serde(flatten)]
        config: SessionConfig,
    },
    /// Query the current status
    Status,
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Session view after the request was handled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SessionSnapshot>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<SessionSnapshot>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true if the daemon accepted the request.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Tests
// ============================================================================
