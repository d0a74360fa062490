mod actor;
pub mod client;
mod handle;
pub mod models;
pub mod normalize;
mod scheduler;
mod session;

pub use actor::new_events;
pub use client::{EventSource, TicketmasterClient};
pub use handle::EventsHandle;
pub use models::{Event, SearchFilters};
pub use scheduler::EventSyncScheduler;
pub use session::EventsSession;

use crate::config::Config;
use crate::error::PulseResult;
use crate::utils::scheduler::Scheduler;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::redis_service::RedisActorHandle;

/// Background event sync component
pub struct EventSync {
    handle: EventsHandle,
    scheduler: EventSyncScheduler,
    started: AtomicBool,
}

impl EventSync {
    /// Create the component around a shared events handle
    pub fn new(handle: EventsHandle) -> Self {
        Self {
            handle,
            scheduler: EventSyncScheduler::new(),
            started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl super::Component for EventSync {
    fn name(&self) -> &'static str {
        "event_sync"
    }

    async fn init(&self, config: Arc<RwLock<Config>>, _redis_handle: RedisActorHandle) -> PulseResult<()> {
        // Start the sync scheduler only once
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Event sync scheduler is already running, skipping initialization");
            return Ok(());
        }

        info!("Starting event sync scheduler");
        self.scheduler.start(config, self.handle.clone()).await
    }

    async fn shutdown(&self) -> PulseResult<()> {
        self.scheduler.stop().await?;
        self.handle.shutdown().await
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
