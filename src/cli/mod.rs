//! CLI module for the session timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `client`: IPC client for daemon communication
//! - `display`: Output formatting and display logic
//! - `watch`: Live clock and countdown view

pub mod client;
pub mod commands;
pub mod display;
pub mod watch;

pub use client::IpcClient;
pub use commands::{Cli, Commands, DaemonArgs, DurationArgs, ThemeChoice};
pub use display::Display;
