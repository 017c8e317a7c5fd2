//! Pomodoro session timer library.
//!
//! This library provides the core functionality for the `pomoclock` CLI.
//! It includes:
//! - Session state machine with work/break cycles and long breaks
//! - A daemon owning the session, driven by a 1 Hz tick subscription
//! - IPC server/client for daemon-CLI communication
//! - Desktop notifications and alert sounds
//! - Persistent preferences (color theme)
//! - CLI command parsing and display utilities

pub mod cli;
pub mod daemon;
pub mod notification;
pub mod paths;
pub mod preferences;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    AlertSound, ConfigError, IpcRequest, IpcResponse, SessionConfig, SessionMode,
    SessionSnapshot, SessionState,
};

pub use daemon::{DaemonOptions, SessionEngine, SessionEvent, SessionHandle};

pub use notification::{
    Delivery, DesktopNotifier, MockNotifier, NotificationError, NotificationPermission, Notifier,
};

pub use sound::{
    MockSoundPlayer, RodioSoundPlayer, SoundError, SoundLibrary, SoundPlayer, SoundSource,
    SoundWorker,
};

pub use preferences::{
    JsonPreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, Theme,
};

pub use paths::AppPaths;
