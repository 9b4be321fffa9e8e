//! Timer-driven flush scheduling.
//!
//! The scheduler is an owned object instead of an ambient recurring timer:
//! `start` spawns the loop, `stop` signals shutdown and waits for it to
//! exit. Cycle errors are logged and never kill the loop; the next tick
//! retries with everything still buffered.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::buffer::MetricBuffer;

pub struct FlushScheduler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl FlushScheduler {
    /// Spawn the recurring flush task. Returns `None` when the configured
    /// interval is 0 (manual flush only).
    pub fn start(buffer: MetricBuffer) -> Option<FlushScheduler> {
        let every = buffer.config().flush_interval_ms;
        if every == 0 {
            return None;
        }
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut tick = interval(Duration::from_millis(every));
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first interval tick fires immediately; skip it so the
            // first window gets a full interval to accumulate
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if let Err(e) = buffer.flush().await {
                            tracing::warn!(code = e.code(), error = %e, "flush cycle failed; values stay buffered");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("flush scheduler stopped");
        });
        Some(FlushScheduler { shutdown, task })
    }

    /// Signal shutdown and wait for the loop to exit. Does not flush; call
    /// [`MetricBuffer::flush`] first when a final drain is needed.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
