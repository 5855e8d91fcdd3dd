// Clock driver: delivers countdown ticks to the orchestrator.
//
// A spawned task emits one `ClockEvent::Tick` per period over an mpsc
// channel. Delivery is suspendable through a watch channel: suspension stops
// ticks without touching any auction state, and resuming waits a full period
// before the next tick. The engine owns no wall-clock logic; tests drive
// `AuctionEngine::tick` directly.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Events emitted by the clock driver to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Tick,
}

/// Control handle for a spawned clock task.
pub struct ClockHandle {
    running: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ClockHandle {
    /// Start or suspend tick delivery. Idempotent.
    pub fn set_running(&self, running: bool) {
        self.running.send_if_modified(|current| {
            if *current != running {
                *current = running;
                true
            } else {
                false
            }
        });
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Stop the clock task entirely.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Spawn the clock task. Delivery starts suspended; the orchestrator enables
/// it when an auction opens.
pub fn spawn(period: Duration, tx: mpsc::Sender<ClockEvent>) -> ClockHandle {
    let (running_tx, mut running_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        // interval_at: a plain interval yields its first tick immediately,
        // which would shave a second off the countdown the moment it starts.
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let running = *running_rx.borrow_and_update();
            if !running {
                // Suspended: wait for the switch without consuming ticks.
                if running_rx.changed().await.is_err() {
                    break;
                }
                // A full period elapses before the first tick after resume.
                interval.reset();
                continue;
            }

            tokio::select! {
                _ = interval.tick() => {
                    if tx.send(ClockEvent::Tick).await.is_err() {
                        break;
                    }
                }
                changed = running_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("clock task stopped");
    });

    ClockHandle {
        running: running_tx,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(1);

    /// Let the spawned clock task run until it has processed pending wakeups.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    /// Drain every tick currently queued on the channel.
    fn drain(rx: &mut mpsc::Receiver<ClockEvent>) -> usize {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn suspended_clock_delivers_nothing() {
        let (tx, mut rx) = mpsc::channel(64);
        let clock = spawn(PERIOD, tx);

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;

        assert_eq!(drain(&mut rx), 0);
        clock.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn running_clock_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::channel(64);
        let clock = spawn(PERIOD, tx);
        clock.set_running(true);

        for _ in 0..3 {
            tokio::time::advance(PERIOD).await;
            settle().await;
        }

        assert_eq!(drain(&mut rx), 3);
        clock.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn suspension_stops_delivery_and_resume_restarts_it() {
        let (tx, mut rx) = mpsc::channel(64);
        let clock = spawn(PERIOD, tx);

        clock.set_running(true);
        tokio::time::advance(PERIOD).await;
        settle().await;
        assert_eq!(drain(&mut rx), 1);

        clock.set_running(false);
        settle().await;
        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(drain(&mut rx), 0);

        clock.set_running(true);
        settle().await;
        tokio::time::advance(PERIOD).await;
        settle().await;
        assert_eq!(drain(&mut rx), 1);

        clock.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn set_running_is_idempotent() {
        let (tx, mut rx) = mpsc::channel(64);
        let clock = spawn(PERIOD, tx);

        clock.set_running(true);
        clock.set_running(true);
        assert!(clock.is_running());

        tokio::time::advance(PERIOD).await;
        settle().await;
        assert_eq!(drain(&mut rx), 1);
        clock.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn clock_task_exits_when_receiver_drops() {
        let (tx, rx) = mpsc::channel(64);
        let clock = spawn(PERIOD, tx);
        clock.set_running(true);
        drop(rx);

        tokio::time::advance(PERIOD).await;
        settle().await;

        // The send fails and the task winds down on its own.
        tokio::time::advance(PERIOD).await;
        settle().await;
        assert!(clock.task.is_finished());
    }
}
