use super::actor::{EventsActor, EventsActorHandle};
use super::client::EventSource;
use super::models::{Event, SearchFilters};
use crate::components::redis_service::RedisActorHandle;
use crate::error::PulseResult;
use crate::utils::state::ViewState;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the events actor
#[derive(Clone)]
pub struct EventsHandle {
    actor_handle: EventsActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl EventsHandle {
    /// Create a new EventsHandle and spawn the actor
    pub fn new(source: Arc<dyn EventSource>, redis_handle: RedisActorHandle) -> Self {
        let (mut actor, handle) = EventsActor::new(source, redis_handle);

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Search events matching the filters
    pub async fn search(&self, filters: SearchFilters) -> PulseResult<Vec<Event>> {
        self.actor_handle.search(filters).await
    }

    /// Search and fold the outcome into a view state
    pub async fn search_state(&self, filters: SearchFilters) -> ViewState<Vec<Event>> {
        match self.search(filters).await {
            Ok(events) => ViewState::Ready(events),
            Err(e) => ViewState::Failed(e.to_string()),
        }
    }

    /// Fetch one event by id
    pub async fn event_details(&self, event_id: impl Into<String>) -> PulseResult<Event> {
        self.actor_handle.event_details(event_id.into()).await
    }

    /// Events in the city not seen at the previous check
    pub async fn check_new_events(&self, city: impl Into<String>) -> PulseResult<Vec<Event>> {
        self.actor_handle.check_new_events(city.into()).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> PulseResult<()> {
        self.actor_handle.shutdown().await
    }
}
