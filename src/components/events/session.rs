use super::handle::EventsHandle;
use super::models::{Event, SearchFilters};
use crate::components::favorites::FavoritesService;
use crate::error::PulseResult;
use crate::utils::state::{StateHolder, ViewState};
use std::collections::HashSet;
use tokio::sync::watch;

/// State for browsing events: the result list, the opened event and
/// which events are favorites.
pub struct EventsSession {
    events: EventsHandle,
    favorites: FavoritesService,
    events_state: StateHolder<ViewState<Vec<Event>>>,
    details_state: StateHolder<Option<ViewState<Event>>>,
}

impl EventsSession {
    pub fn new(events: EventsHandle, favorites: FavoritesService) -> Self {
        Self {
            events,
            favorites,
            events_state: StateHolder::new(ViewState::Loading),
            details_state: StateHolder::new(None),
        }
    }

    pub fn events_state(&self) -> watch::Receiver<ViewState<Vec<Event>>> {
        self.events_state.subscribe()
    }

    pub fn details_state(&self) -> watch::Receiver<Option<ViewState<Event>>> {
        self.details_state.subscribe()
    }

    pub fn favorite_ids(&self) -> watch::Receiver<HashSet<String>> {
        self.favorites.favorite_ids()
    }

    /// Run a search, publishing `Loading` and then the outcome
    pub async fn search_events(&self, filters: SearchFilters) -> ViewState<Vec<Event>> {
        self.events_state.set(ViewState::Loading);
        let state = self.events.search_state(filters).await;

        if let ViewState::Ready(events) = &state {
            self.favorites.refresh_favorite_statuses(events).await;
        }

        self.events_state.set(state.clone());
        state
    }

    /// Load one event into the details state
    pub async fn event_details(&self, event_id: &str) -> ViewState<Event> {
        self.details_state.set(Some(ViewState::Loading));
        let state = match self.events.event_details(event_id).await {
            Ok(event) => {
                self.favorites.check_favorite_status(&event.id).await;
                ViewState::Ready(event)
            }
            Err(e) => ViewState::Failed(e.to_string()),
        };
        self.details_state.set(Some(state.clone()));
        state
    }

    /// Flip an event's favorite status
    pub async fn toggle_favorite(&self, event: &Event) -> PulseResult<bool> {
        self.favorites.toggle_favorite(event).await
    }
}
