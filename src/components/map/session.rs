use crate::components::events::{Event, EventsHandle, SearchFilters};
use crate::components::geocoding::GeocodingService;
use crate::components::travel::{TravelEstimator, TravelInfo};
use crate::utils::geo::{haversine_km, Coordinates};
use crate::utils::state::{StateHolder, ViewState};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Location-aware state for the map: where the user is, which city was
/// searched, the events found and the travel info to the selected one.
pub struct MapSession {
    events: EventsHandle,
    geocoding: GeocodingService,
    travel: TravelEstimator,
    events_state: StateHolder<ViewState<Vec<Event>>>,
    current_location: StateHolder<Option<Coordinates>>,
    selected_event: StateHolder<Option<Event>>,
    travel_info: StateHolder<Option<TravelInfo>>,
    searched_city: StateHolder<String>,
    geocoded_location: StateHolder<Option<Coordinates>>,
    travel_generation: AtomicU64,
}

impl MapSession {
    pub fn new(events: EventsHandle, geocoding: GeocodingService, travel: TravelEstimator) -> Self {
        Self {
            events,
            geocoding,
            travel,
            // Nothing is loaded until a city is searched
            events_state: StateHolder::new(ViewState::Ready(Vec::new())),
            current_location: StateHolder::new(None),
            selected_event: StateHolder::new(None),
            travel_info: StateHolder::new(None),
            searched_city: StateHolder::new(String::new()),
            geocoded_location: StateHolder::new(None),
            travel_generation: AtomicU64::new(0),
        }
    }

    pub fn events_state(&self) -> watch::Receiver<ViewState<Vec<Event>>> {
        self.events_state.subscribe()
    }

    pub fn current_location(&self) -> watch::Receiver<Option<Coordinates>> {
        self.current_location.subscribe()
    }

    pub fn selected_event(&self) -> watch::Receiver<Option<Event>> {
        self.selected_event.subscribe()
    }

    pub fn travel_info(&self) -> watch::Receiver<Option<TravelInfo>> {
        self.travel_info.subscribe()
    }

    pub fn searched_city(&self) -> watch::Receiver<String> {
        self.searched_city.subscribe()
    }

    pub fn geocoded_location(&self) -> watch::Receiver<Option<Coordinates>> {
        self.geocoded_location.subscribe()
    }

    /// Record a location fix and refresh travel info for the selection
    pub async fn set_current_location(&self, location: Coordinates) {
        info!("Location received: {}", location);
        self.current_location.set(Some(location));
        let generation = self.next_travel_generation();

        if let Some(event) = self.selected_event.get() {
            self.calculate_travel_info(&event, generation).await;
        }
    }

    /// Select an event and compute travel info to it
    pub async fn select_event(&self, event: Event) {
        self.selected_event.set(Some(event.clone()));
        let generation = self.next_travel_generation();
        self.calculate_travel_info(&event, generation).await;
    }

    pub fn clear_selection(&self) {
        self.next_travel_generation();
        self.selected_event.set(None);
        self.travel_info.set(None);
    }

    /// Invalidate every travel estimate still in flight
    fn next_travel_generation(&self) -> u64 {
        self.travel_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn calculate_travel_info(&self, event: &Event, generation: u64) {
        let origin = self.current_location.get();
        let info = self.travel.estimate(origin, event.coordinates).await;

        // Selection or location changed while we were waiting
        if self.travel_generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale travel info for event {}", event.id);
            return;
        }

        self.travel_info.set(info);
    }

    /// Load events matching the filters
    pub async fn load_events(&self, filters: SearchFilters) {
        self.events_state.set(ViewState::Loading);
        let state = self.events.search_state(filters).await;
        self.events_state.set(state);
    }

    /// Geocode a city and load its events
    pub async fn search_city(&self, city_name: &str) {
        info!("Searching for city: {}", city_name);
        self.searched_city.set(city_name.to_string());

        let coordinates = self.geocoding.get_coordinates(city_name).await;
        self.geocoded_location.set(coordinates);

        match coordinates {
            Some(c) => debug!("Geocoded {} to {}", city_name, c),
            None => warn!("Could not geocode {}, searching by name only", city_name),
        }

        self.load_events(SearchFilters::for_city(city_name)).await;
    }

    /// Straight-line distance from the current location to an event
    pub fn distance_to_event(&self, event: &Event) -> Option<f64> {
        let origin = self.current_location.get()?;
        let destination = event.coordinates?;
        Some(haversine_km(&origin, &destination))
    }

    /// Loaded events within `radius_km` of the current location, nearest first
    pub fn nearby_events(&self, radius_km: f64) -> Vec<(Event, f64)> {
        let state = self.events_state.get();
        let Some(events) = state.ready() else {
            return Vec::new();
        };

        let mut nearby: Vec<(Event, f64)> = events
            .iter()
            .filter_map(|event| {
                self.distance_to_event(event)
                    .filter(|distance| *distance <= radius_km)
                    .map(|distance| (event.clone(), distance))
            })
            .collect();

        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
        nearby
    }
}
