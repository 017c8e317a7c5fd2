//! Display utilities for the pomoclock CLI.
//!
//! This module provides formatted output for:
//! - Command results
//! - Error messages
//! - Status display with a themed progress bar
//! - The single-line `watch` view

use crate::preferences::Theme;
use crate::types::{IpcResponse, SessionMode, SessionSnapshot};

/// Width of the progress bar, in cells.
pub const PROGRESS_WIDTH: usize = 24;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the result of a toggle.
    pub fn show_toggle_success(response: &IpcResponse) {
        let marker = match &response.data {
            Some(data) if data.is_running => ">",
            _ => "||",
        };
        println!("{} {}", marker, response.message);
        Self::show_remaining(response);
    }

    /// Shows the result of a reset.
    pub fn show_reset_success(response: &IpcResponse) {
        println!("[] {}", response.message);
        Self::show_remaining(response);
    }

    /// Shows the result of applying a configuration.
    pub fn show_apply_success(response: &IpcResponse) {
        println!("* {}", response.message);
        if let Some(data) = &response.data {
            println!("  {}", Self::config_summary(data));
        }
    }

    /// Shows the current session status.
    pub fn show_status(response: &IpcResponse, theme: Theme) {
        match &response.data {
            Some(data) => println!("{}", Self::render_status(data, theme)),
            None => println!("No session data"),
        }
    }

    pub fn show_theme(theme: Theme) {
        println!("Theme: {}", theme);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    fn show_remaining(response: &IpcResponse) {
        if let Some(data) = &response.data {
            println!("  {} {}", Self::mode_label(data), data.remaining);
        }
    }

    /// Multi-line status block.
    pub fn render_status(data: &SessionSnapshot, theme: Theme) -> String {
        let state = if data.is_running { "running" } else { "paused" };

        [
            "Pomodoro Clock".to_string(),
            "─────────────────────────────".to_string(),
            format!("Mode:      {} ({})", Self::mode_label(data), state),
            format!("Remaining: {}", data.remaining),
            format!(
                "Progress:  {} {:>3.0}%",
                Self::progress_bar(data.progress_percent, PROGRESS_WIDTH, theme),
                data.progress_percent
            ),
            format!(
                "Cycles:    {} (long break every {})",
                data.cycles_completed, data.config.cycle_threshold
            ),
            format!("Config:    {}", Self::config_summary(data)),
        ]
        .join("\n")
    }

    /// Single line for `watch`: wall clock, then the session if reachable.
    pub fn render_watch_line(clock: &str, data: Option<&SessionSnapshot>, theme: Theme) -> String {
        match data {
            Some(data) => format!(
                "{}  {:<15} {}  {}{}",
                clock,
                Self::mode_label(data),
                data.remaining,
                Self::progress_bar(data.progress_percent, PROGRESS_WIDTH, theme),
                if data.is_running { "" } else { "  (paused)" }
            ),
            None => format!("{}  daemon not reachable", clock),
        }
    }

    /// Fixed-width bar for a 0-100 percentage.
    pub fn progress_bar(percent: f64, width: usize, theme: Theme) -> String {
        let (filled, empty) = match theme {
            Theme::Light => ('█', '░'),
            Theme::Dark => ('▓', '·'),
        };

        let ratio = if percent.is_finite() {
            percent.clamp(0.0, 100.0) / 100.0
        } else {
            0.0
        };
        let cells = ((ratio * width as f64).round() as usize).min(width);

        let mut bar = String::with_capacity(width * 3);
        bar.extend(std::iter::repeat(filled).take(cells));
        bar.extend(std::iter::repeat(empty).take(width - cells));
        bar
    }

    fn mode_label(data: &SessionSnapshot) -> &'static str {
        match data.mode {
            SessionMode::Break if data.long_break => "Long Break Time",
            mode => mode.label(),
        }
    }

    fn config_summary(data: &SessionSnapshot) -> String {
        let config = &data.config;
        format!(
            "work {}m, break {}m, long break {}m",
            config.work_duration / 60,
            config.break_duration / 60,
            config.long_break_duration / 60
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SessionConfig, SessionState};

    fn snapshot_with(f: impl FnOnce(&mut SessionState)) -> SessionSnapshot {
        let config = SessionConfig::default();
        let mut state = SessionState::new(&config);
        f(&mut state);
        SessionSnapshot::capture(&state, &config)
    }

    // ------------------------------------------------------------------------
    // Progress Bar Tests
    // ------------------------------------------------------------------------

    mod progress_bar_tests {
        use super::*;

        #[test]
        fn test_empty_and_full() {
            assert_eq!(Display::progress_bar(0.0, 4, Theme::Light), "░░░░");
            assert_eq!(Display::progress_bar(100.0, 4, Theme::Light), "████");
        }

        #[test]
        fn test_half() {
            assert_eq!(Display::progress_bar(50.0, 4, Theme::Light), "██░░");
            assert_eq!(Display::progress_bar(50.0, 4, Theme::Dark), "▓▓··");
        }

        #[test]
        fn test_out_of_range_is_clamped() {
            assert_eq!(Display::progress_bar(-10.0, 3, Theme::Light), "░░░");
            assert_eq!(Display::progress_bar(250.0, 3, Theme::Light), "███");
            assert_eq!(Display::progress_bar(f64::NAN, 3, Theme::Light), "░░░");
        }

        #[test]
        fn test_width_is_constant() {
            for percent in [0.0, 12.5, 33.3, 66.7, 99.9, 100.0] {
                let bar = Display::progress_bar(percent, PROGRESS_WIDTH, Theme::Dark);
                assert_eq!(bar.chars().count(), PROGRESS_WIDTH);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Status Rendering Tests
    // ------------------------------------------------------------------------

    mod render_tests {
        use super::*;

        #[test]
        fn test_render_fresh_status() {
            let data = snapshot_with(|_| {});
            let output = Display::render_status(&data, Theme::Light);

            assert!(output.contains("Work Time (paused)"));
            assert!(output.contains("Remaining: 25:00"));
            assert!(output.contains("0%"));
            assert!(output.contains("long break every 10"));
            assert!(output.contains("work 25m, break 5m, long break 15m"));
        }

        #[test]
        fn test_render_running_break() {
            let data = snapshot_with(|state| {
                state.mode = SessionMode::Break;
                state.total_session_time = 300;
                state.seconds_left = 150;
                state.cycles_completed = 1;
                state.is_running = true;
            });
            let output = Display::render_status(&data, Theme::Dark);

            assert!(output.contains("Break Time (running)"));
            assert!(output.contains("02:30"));
            assert!(output.contains("50%"));
        }

        #[test]
        fn test_render_long_break_label() {
            let data = snapshot_with(|state| {
                state.mode = SessionMode::Break;
                state.cycles_completed = 10;
                state.total_session_time = 900;
                state.seconds_left = 900;
            });

            assert!(Display::render_status(&data, Theme::Light).contains("Long Break Time"));
        }

        #[test]
        fn test_watch_line() {
            let data = snapshot_with(|state| state.seconds_left = 1499);
            let line = Display::render_watch_line("14:03:07", Some(&data), Theme::Light);

            assert!(line.starts_with("14:03:07"));
            assert!(line.contains("24:59"));
            assert!(line.ends_with("(paused)"));
        }

        #[test]
        fn test_watch_line_without_daemon() {
            let line = Display::render_watch_line("09:00:00", None, Theme::Dark);
            assert_eq!(line, "09:00:00  daemon not reachable");
        }
    }
}
