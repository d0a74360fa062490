use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::handle::EventsHandle;
use crate::config::Config;
use crate::error::PulseResult;
use crate::utils::scheduler::Scheduler;

/// Periodic background sync of the default city's events
#[derive(Clone, Default)]
pub struct EventSyncScheduler {
    cancel: CancellationToken,
}

impl EventSyncScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Scheduler for EventSyncScheduler {
    type Handle = EventsHandle;

    fn start(
        &self,
        config: Arc<RwLock<Config>>,
        handle: Self::Handle,
    ) -> Pin<Box<dyn Future<Output = PulseResult<()>> + Send>> {
        let cancel = self.cancel.clone();

        Box::pin(async move {
            let (city, interval, retry) = {
                let config = config.read().await;
                (
                    config.default_city.clone(),
                    Duration::from_secs(config.sync_interval_secs),
                    Duration::from_secs(config.sync_retry_secs),
                )
            };

            info!(
                "Starting event sync for {} every {}s (retry after {}s)",
                city,
                interval.as_secs(),
                retry.as_secs()
            );

            tokio::spawn(async move {
                // First sync runs right away to seed the snapshot
                let mut delay = Duration::ZERO;

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("Event sync stopped");
                            break;
                        }
                        _ = sleep(delay) => {}
                    }

                    delay = match handle.check_new_events(city.clone()).await {
                        Ok(new_events) => {
                            if new_events.is_empty() {
                                info!("Event sync for {}: no new events", city);
                            } else {
                                info!("Event sync for {}: {} new events", city, new_events.len());
                                for event in &new_events {
                                    info!("New event: {} ({}) at {}", event.name, event.start_time, event.venue_name);
                                }
                            }
                            interval
                        }
                        Err(e) => {
                            error!("Event sync for {} failed, retrying in {}s: {}", city, retry.as_secs(), e);
                            retry
                        }
                    };
                }
            });

            Ok(())
        })
    }

    fn stop(&self) -> Pin<Box<dyn Future<Output = PulseResult<()>> + Send>> {
        let cancel = self.cancel.clone();
        Box::pin(async move {
            cancel.cancel();
            Ok(())
        })
    }
}
