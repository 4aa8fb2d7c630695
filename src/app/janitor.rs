use crate::domain_port::{Clock, ExpirySweep};
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Periodically drops expired in-process state until cancelled.
pub struct Janitor {
    targets: Vec<Arc<dyn ExpirySweep>>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    cancel: CancellationToken,
}

impl Janitor {
    pub fn try_new(
        targets: Vec<Arc<dyn ExpirySweep>>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> anyhow::Result<Self> {
        if interval.is_zero() {
            anyhow::bail!("sweep interval must be greater than zero");
        }
        Ok(Self {
            targets,
            clock,
            interval,
            cancel,
        })
    }

    pub fn sweep_once(&self) -> usize {
        let now = self.clock.now();
        self.targets
            .iter()
            .map(|t| {
                let dropped = t.sweep(now);
                if dropped > 0 {
                    debug!(target_name = t.name(), dropped, "swept expired entries");
                }
                dropped
            })
            .sum()
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.sweep_once();
                }
            }
        }
        info!("janitor stopped");
    }
}
