use super::client::EventSource;
use super::models::{Event, SearchFilters};
use crate::components::redis_service::RedisActorHandle;
use crate::error::{event_api_error, PulseResult};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The events actor that processes messages
pub struct EventsActor {
    source: Arc<dyn EventSource>,
    command_rx: mpsc::Receiver<EventsCommand>,
    redis_handle: RedisActorHandle,
}

/// Commands that can be sent to the events actor
pub enum EventsCommand {
    Search(SearchFilters, mpsc::Sender<PulseResult<Vec<Event>>>),
    Details(String, mpsc::Sender<PulseResult<Event>>),
    CheckNewEvents(String, mpsc::Sender<PulseResult<Vec<Event>>>),
    Shutdown,
}

/// Handle for communicating with the events actor
#[derive(Clone)]
pub struct EventsActorHandle {
    command_tx: mpsc::Sender<EventsCommand>,
}

impl EventsActorHandle {
    /// Search events matching the filters
    pub async fn search(&self, filters: SearchFilters) -> PulseResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventsCommand::Search(filters, response_tx))
            .await
            .map_err(|e| event_api_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| event_api_error("Response channel closed"))?
    }

    /// Fetch one event
    pub async fn event_details(&self, event_id: String) -> PulseResult<Event> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventsCommand::Details(event_id, response_tx))
            .await
            .map_err(|e| event_api_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| event_api_error("Response channel closed"))?
    }

    /// Check for events in a city that were not in the last snapshot
    pub async fn check_new_events(&self, city: String) -> PulseResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventsCommand::CheckNewEvents(city, response_tx))
            .await
            .map_err(|e| event_api_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| event_api_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> PulseResult<()> {
        let _ = self.command_tx.send(EventsCommand::Shutdown).await;
        Ok(())
    }
}

impl EventsActor {
    /// Create a new actor and return its handle
    pub fn new(
        source: Arc<dyn EventSource>,
        redis_handle: RedisActorHandle,
    ) -> (Self, EventsActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            source,
            command_rx,
            redis_handle,
        };

        (actor, EventsActorHandle { command_tx })
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Events actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                EventsCommand::Search(filters, response_tx) => {
                    let result = self.source.search(&filters).await;
                    match &result {
                        Ok(events) => info!("Search for {:?} returned {} events", filters.city, events.len()),
                        Err(e) => warn!("Search for {:?} failed: {}", filters.city, e),
                    }
                    let _ = response_tx.send(result).await;
                }
                EventsCommand::Details(event_id, response_tx) => {
                    let result = self.source.event_details(&event_id).await;
                    let _ = response_tx.send(result).await;
                }
                EventsCommand::CheckNewEvents(city, response_tx) => {
                    let result = self.check_new_events(&city).await;
                    let _ = response_tx.send(result).await;
                }
                EventsCommand::Shutdown => {
                    info!("Events actor shutting down");
                    break;
                }
            }
        }

        info!("Events actor shut down");
    }

    /// Search the city, diff against the stored snapshot and store the new one
    async fn check_new_events(&self, city: &str) -> PulseResult<Vec<Event>> {
        let current_events = self.source.search(&SearchFilters::for_city(city)).await?;

        let last_known_events = self.redis_handle.get_snapshot(city).await?;
        let fresh = new_events(&last_known_events, &current_events);

        if !current_events.is_empty() {
            self.redis_handle.save_snapshot(city, current_events).await?;
        }

        Ok(fresh)
    }
}

/// Events in `current` whose id does not appear in `previous`
pub fn new_events(previous: &[Event], current: &[Event]) -> Vec<Event> {
    let known: HashSet<&str> = previous.iter().map(|e| e.id.as_str()).collect();
    current
        .iter()
        .filter(|e| !known.contains(e.id.as_str()))
        .cloned()
        .collect()
}
