use super::client::DashboardClient;
use crate::model::HealthStatus;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Background poll of `/pipeline-health`.
///
/// Probes once right away and then on every interval tick. The task lives
/// until [`HealthPoller::stop`] is awaited or the poller is dropped.
pub struct HealthPoller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    status: watch::Receiver<HealthStatus>,
}

/// Ticks every `every`, first tick immediate. A probe that overruns several
/// ticks is followed by one probe, not a burst of catch-up probes.
fn poll_interval(every: Duration) -> Interval {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl HealthPoller {
    pub fn start(client: DashboardClient, every: Duration) -> Self {
        let (tx, status) = watch::channel(HealthStatus::Unknown);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.child_token();

        let handle = tokio::spawn(async move {
            let mut interval = poll_interval(every);
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!("Health poller received cancel signal");
                        break;
                    }
                    _ = interval.tick() => {
                        let next = tokio::select! {
                            _ = task_cancel.cancelled() => break,
                            s = client.pipeline_health() => s,
                        };
                        tx.send_if_modified(|current| {
                            if *current != next {
                                info!("Pipeline health: {} -> {}", current, next);
                                *current = next;
                                true
                            } else {
                                false
                            }
                        });
                    }
                }
            }
        });

        info!("Health poller started (interval: {:?})", every);
        Self {
            cancel,
            handle: Some(handle),
            status,
        }
    }

    pub fn status(&self) -> HealthStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthStatus> {
        self.status.clone()
    }

    /// Cancel the poll and wait for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        let Some(handle) = self.handle.take() else {
            return;
        };
        match handle.await {
            Ok(()) => debug!("Health poller stopped"),
            Err(e) if e.is_cancelled() => debug!("Health poller aborted"),
            Err(e) => warn!("Health poller error: {}", e),
        }
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
