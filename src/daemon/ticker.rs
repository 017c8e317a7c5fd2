//! One-second tick subscription.
//!
//! A [`Ticker`] owns at most one interval task at a time. Each subscription
//! gets a new generation number; ticks carry the generation they were
//! produced under so the consumer can drop ticks from a torn-down
//! subscription that were already queued.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::trace;

/// Tick cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A single tick delivered by a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal {
    /// Subscription that produced the tick
    pub generation: u64,
}

/// Resubscribable 1 Hz tick source.
pub struct Ticker {
    tick_tx: mpsc::UnboundedSender<TickSignal>,
    generation: u64,
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl Ticker {
    /// Creates an idle ticker delivering into `tick_tx`.
    pub fn new(tick_tx: mpsc::UnboundedSender<TickSignal>) -> Self {
        Self::with_period(tick_tx, TICK_PERIOD)
    }

    /// Creates an idle ticker with a custom period.
    pub fn with_period(tick_tx: mpsc::UnboundedSender<TickSignal>, period: Duration) -> Self {
        Self {
            tick_tx,
            generation: 0,
            task: None,
            period,
        }
    }

    /// Replaces any running subscription with a fresh one.
    ///
    /// The first tick arrives one period after this call.
    pub fn subscribe(&mut self) {
        self.unsubscribe();
        self.generation += 1;

        let generation = self.generation;
        let tx = self.tick_tx.clone();
        let period = self.period;

        self.task = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;
                if tx.send(TickSignal { generation }).is_err() {
                    break;
                }
            }
        }));

        trace!(generation, "Tick subscription started");
    }

    /// Stops the running subscription, if any.
    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            trace!(generation = self.generation, "Tick subscription stopped");
        }
    }

    /// Returns true if `signal` came from the live subscription.
    pub fn is_current(&self, signal: TickSignal) -> bool {
        self.task.is_some() && signal.generation == self.generation
    }

    /// Returns true while a subscription is active.
    pub fn is_subscribed(&self) -> bool {
        self.task.is_some()
    }

    /// Returns the generation of the latest subscription.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
