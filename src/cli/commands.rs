//! Command definitions for the pomoclock CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{minutes_to_seconds, SessionConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro session timer
#[derive(Parser, Debug)]
#[command(
    name = "pomoclock",
    version,
    about = "Pomodoro session timer",
    long_about = "A Pomodoro session timer that alternates work and break intervals,\n\
                  with a long break after a configurable number of work cycles.\n\
                  Run `pomoclock daemon` once, then control it from any terminal.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path (defaults to $POMOCLOCK_HOME/pomoclock.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start or pause the countdown
    Toggle,

    /// Stop and return to a fresh work interval
    Reset,

    /// Show current session status
    Status,

    /// Change durations and the long-break cadence (stops the timer)
    Apply(DurationArgs),

    /// Show a live clock and countdown until Ctrl-C
    Watch,

    /// Show or change the color theme
    Theme {
        /// New theme; omit to print the current one
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },

    /// Run the session daemon in the foreground
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Theme argument values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Light,
    Dark,
    /// Switch to the other theme
    Toggle,
}

// ============================================================================
// Duration Arguments
// ============================================================================

/// Durations in minutes; omitted values keep their current setting.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationArgs {
    /// Work duration in minutes (1-120)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_time: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: Option<u32>,

    /// Completed work cycles before a long break (1-100)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub cycles: Option<u32>,
}

impl DurationArgs {
    /// Returns true if no flag was given.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the given flags on top of `base`, converting minutes to seconds.
    pub fn overlay(&self, base: &SessionConfig) -> SessionConfig {
        let mut config = base.clone();
        if let Some(work) = self.work {
            config.work_duration = minutes_to_seconds(work);
        }
        if let Some(brk) = self.break_time {
            config.break_duration = minutes_to_seconds(brk);
        }
        if let Some(long_brk) = self.long_break {
            config.long_break_duration = minutes_to_seconds(long_brk);
        }
        if let Some(cycles) = self.cycles {
            config.cycle_threshold = cycles;
        }
        config
    }
}

// ============================================================================
// Daemon Arguments
// ============================================================================

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// Initial durations (defaults: 25/5/15 minutes, 10 cycles)
    #[command(flatten)]
    pub durations: DurationArgs,

    /// Directory with custom alert sounds (alarm-work-end.mp3, ...)
    #[arg(long, value_name = "DIR")]
    pub sounds_dir: Option<PathBuf>,

    /// Disable alert sounds
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,
}

// ============================================================================
// Tests
// ============================================================================
