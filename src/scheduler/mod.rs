use crate::error::Result;
use crate::notifier::ChangeNotifier;
use crate::observability::metrics::{
    CYCLES_COMPLETED, CYCLE_FAILURES, CYCLE_LATENCY, TRACKED_SYMBOLS,
};
use crate::observability::tracing::trace_poll_cycle;
use crate::poller::PollOrchestrator;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, Instrument};

pub mod state;

pub use state::PollerState;

/// Fixed-cadence driver of the pipeline: poll, persist, notify, sleep,
/// forever. Cycles are strictly sequential and any cycle error is logged and
/// swallowed; only process termination stops the loop.
pub struct Scheduler {
    orchestrator: PollOrchestrator,
    notifier: ChangeNotifier,
    interval: Duration,
}

impl Scheduler {
    pub fn new(orchestrator: PollOrchestrator, notifier: ChangeNotifier, interval: Duration) -> Self {
        Scheduler {
            orchestrator,
            notifier,
            interval,
        }
    }

    pub async fn run(&self, state: &PollerState) {
        let mut cycle: u64 = 0;

        loop {
            cycle += 1;
            let started = Instant::now();

            match self
                .run_cycle(state)
                .instrument(trace_poll_cycle(cycle))
                .await
            {
                Ok(notified) => {
                    CYCLES_COMPLETED.inc();
                    info!(
                        "Cycle {} done in {:?}, notified={}",
                        cycle,
                        started.elapsed(),
                        notified
                    );
                }
                Err(e) => {
                    CYCLE_FAILURES.inc();
                    error!("Cycle {} failed: {}", cycle, e);
                }
            }

            let elapsed = started.elapsed();
            CYCLE_LATENCY.observe(elapsed.as_secs_f64());

            // Self-throttling floor, not a catch-up scheduler: a cycle that
            // overruns never shortens the following sleep below the
            // configured interval.
            let sleep_for = self.interval.max(self.interval.saturating_sub(elapsed));
            tokio::time::sleep(sleep_for).await;
        }
    }

    /// One complete pass: capture symbols, poll, persist, compare, notify.
    pub async fn run_cycle(&self, state: &PollerState) -> Result<bool> {
        let symbols = state.capture_symbols()?;
        TRACKED_SYMBOLS.set(symbols.len() as i64);

        let previous_raw = state.last_snapshot_raw().await?;
        let snapshot = self.orchestrator.poll_all(&symbols).await;
        info!(
            "Polled {} symbols, {} in snapshot",
            symbols.len(),
            snapshot.len()
        );

        let new_raw = state.commit_snapshot(&snapshot).await?;
        self.notifier.notify_if_changed(&previous_raw, &new_raw).await
    }
}
