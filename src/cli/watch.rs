//! Live `watch` view.
//!
//! The wall clock and the session status are two independent
//! subscriptions: the clock redraws every second on its own timer, while a
//! background task polls the daemon and publishes the latest snapshot.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::preferences::Theme;
use crate::types::SessionSnapshot;

use super::client::IpcClient;
use super::display::Display;

/// Wall clock redraw period.
const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Daemon status poll period.
const POLL_PERIOD: Duration = Duration::from_millis(500);

/// Format of the wall clock.
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Runs the live view until Ctrl-C.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub async fn run(client: IpcClient, theme: Theme) -> Result<()> {
    let (snapshot_tx, snapshot_rx) = watch::channel(None);
    let poller = tokio::spawn(poll_status(client.without_retry(), snapshot_tx));

    let outcome = draw_clock(snapshot_rx, theme).await;

    poller.abort();
    println!();
    outcome
}

async fn draw_clock(
    snapshot_rx: watch::Receiver<Option<SessionSnapshot>>,
    theme: Theme,
) -> Result<()> {
    let mut clock = interval(CLOCK_PERIOD);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut stdout = std::io::stdout();
    let mut last_width: usize = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => return Ok(()),
            _ = clock.tick() => {
                let now = Local::now().format(CLOCK_FORMAT).to_string();
                let line = Display::render_watch_line(&now, snapshot_rx.borrow().as_ref(), theme);

                let width = line.chars().count();
                let padding = last_width.saturating_sub(width);
                last_width = width;

                write!(stdout, "\r{}{}", line, " ".repeat(padding))
                    .and_then(|()| stdout.flush())
                    .context("Failed to write to stdout")?;
            }
        }
    }
}

/// Publishes the daemon's status, or `None` while it is unreachable.
async fn poll_status(client: IpcClient, snapshot_tx: watch::Sender<Option<SessionSnapshot>>) {
    let mut ticks = interval(POLL_PERIOD);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;

        let snapshot = match client.status().await {
            Ok(response) => response.data,
            Err(e) => {
                debug!("Status poll failed: {:#}", e);
                None
            }
        };

        if snapshot_tx.send(snapshot).is_err() {
            break;
        }
    }
}
