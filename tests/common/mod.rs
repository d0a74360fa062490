#![allow(dead_code)]

use async_trait::async_trait;
use localpulse::components::events::{Event, EventSource, SearchFilters};
use localpulse::components::favorites::{Favorite, FavoritesStore};
use localpulse::components::geocoding::Geocoder;
use localpulse::components::travel::{RouteLeg, RoutingService, TravelMode};
use localpulse::config::Config;
use localpulse::error::{
    distance_matrix_error, event_api_error, geocoding_error, redis_error, PulseResult,
};
use localpulse::utils::geo::Coordinates;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BUCHAREST: Coordinates = Coordinates {
    latitude: 44.4268,
    longitude: 26.1025,
};

/// Config with dummy keys and local endpoints
pub fn test_config() -> Config {
    Config {
        ticketmaster_api_key: "test_tm_key".to_string(),
        google_maps_api_key: "test_maps_key".to_string(),
        ticketmaster_base_url: "http://127.0.0.1:9/discovery/v2".to_string(),
        distance_matrix_url: "http://127.0.0.1:9/distancematrix/json".to_string(),
        geocoding_url: "http://127.0.0.1:9/geocode/json".to_string(),
        redis_url: "redis://127.0.0.1:6379".to_string(),
        default_city: "Bucharest".to_string(),
        page_size: 50,
        sync_interval_secs: 43200,
        sync_retry_secs: 300,
        geocode_cache_capacity: 16,
        http_timeout_secs: 5,
        components: Config::default_components(),
    }
}

pub fn event(id: &str, coordinates: Option<Coordinates>) -> Event {
    Event {
        id: id.to_string(),
        name: format!("Event {}", id),
        url: format!("https://tickets.example/{}", id),
        start_time: "2025-06-01 20:00".to_string(),
        venue_name: "Arenele Romane".to_string(),
        venue_address: "Str. Cutitul de Argint, Bucharest".to_string(),
        coordinates,
        ..Default::default()
    }
}

/// Discovery search body with one complete event and one bare event
pub fn sample_search_body() -> &'static str {
    r#"{
        "_embedded": {
            "events": [
                {
                    "id": "G5diZ9",
                    "name": "Summer Concert",
                    "url": "https://www.ticketmaster.com/event/G5diZ9",
                    "info": "Doors open at 19:00",
                    "pleaseNote": "No cameras",
                    "images": [
                        { "url": "https://img.example/small.jpg", "width": 100, "height": 56 },
                        { "url": "https://img.example/large.jpg", "width": 400, "height": 225 },
                        { "url": "https://img.example/unknown.jpg" }
                    ],
                    "dates": { "start": { "localDate": "2025-06-01", "localTime": "20:00:00" } },
                    "_embedded": {
                        "venues": [
                            {
                                "name": "Arenele Romane",
                                "address": { "line1": "Str. Cutitul de Argint 4" },
                                "city": { "name": "Bucharest" },
                                "country": { "name": "Romania" },
                                "location": { "latitude": "44.4093", "longitude": "26.1006" }
                            }
                        ]
                    }
                },
                {
                    "id": "Z7r9jZ1",
                    "name": "Mystery Show",
                    "url": "https://www.ticketmaster.com/event/Z7r9jZ1"
                }
            ]
        },
        "page": { "size": 50, "totalElements": 2, "totalPages": 1, "number": 0 }
    }"#
}

/// Event source returning canned events or failing every call
pub struct MockEventSource {
    events: Mutex<Vec<Event>>,
    fail: bool,
    calls: AtomicUsize,
    last_filters: Mutex<Option<SearchFilters>>,
}

impl MockEventSource {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            fail: false,
            calls: AtomicUsize::new(0),
            last_filters: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_events(Vec::new())
        }
    }

    pub fn set_events(&self, events: Vec<Event>) {
        *self.events.lock().unwrap() = events;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_filters(&self) -> Option<SearchFilters> {
        self.last_filters.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn search(&self, filters: &SearchFilters) -> PulseResult<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filters.lock().unwrap() = Some(filters.clone());

        if self.fail {
            return Err(event_api_error("Ticketmaster returned 503"));
        }
        Ok(self.events.lock().unwrap().clone())
    }

    async fn event_details(&self, event_id: &str) -> PulseResult<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(event_api_error("Ticketmaster returned 503"));
        }
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|event| event.id == event_id)
            .cloned()
            .ok_or_else(|| event_api_error("Event not found"))
    }
}

/// Routing service with a programmable result per mode
pub struct MockRouting {
    legs: HashMap<TravelMode, RouteLeg>,
    delay: Option<Duration>,
    slow_origin: Option<(Coordinates, Duration)>,
    calls: AtomicUsize,
}

impl MockRouting {
    /// Every request fails
    pub fn unavailable() -> Self {
        Self {
            legs: HashMap::new(),
            delay: None,
            slow_origin: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Requests starting at `origin` take `delay` to answer
    pub fn with_slow_origin(mut self, origin: Coordinates, delay: Duration) -> Self {
        self.slow_origin = Some((origin, delay));
        self
    }

    pub fn with_leg(mut self, mode: TravelMode, leg: RouteLeg) -> Self {
        self.legs.insert(mode, leg);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingService for MockRouting {
    async fn route(
        &self,
        origin: Coordinates,
        _destination: Coordinates,
        mode: TravelMode,
    ) -> PulseResult<RouteLeg> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((slow, delay)) = self.slow_origin {
            if slow == origin {
                tokio::time::sleep(delay).await;
            }
        }

        self.legs
            .get(&mode)
            .cloned()
            .ok_or_else(|| distance_matrix_error(&format!("No {} route", mode)))
    }
}

pub fn leg(meters: u64, distance_text: &str, seconds: u64, duration_text: &str) -> RouteLeg {
    RouteLeg {
        distance_meters: meters,
        distance_text: distance_text.to_string(),
        duration_seconds: seconds,
        duration_text: duration_text.to_string(),
    }
}

/// Geocoder with fixed answers; unknown names fail
pub struct MockGeocoder {
    places: HashMap<String, Option<Coordinates>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            places: HashMap::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_place(mut self, name: &str, coordinates: Option<Coordinates>) -> Self {
        self.places.insert(name.to_string(), coordinates);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn lookup(&self, place: &str) -> PulseResult<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.places
            .get(place)
            .copied()
            .ok_or_else(|| geocoding_error("REQUEST_DENIED"))
    }
}

/// In-memory favorites keyed by (user, event)
#[derive(Default)]
pub struct MockFavoritesStore {
    records: Mutex<HashMap<(String, String), Favorite>>,
    fail: bool,
}

impl MockFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self, user_id: &str) -> usize {
        self.records
            .lock()
            .unwrap()
            .keys()
            .filter(|(user, _)| user == user_id)
            .count()
    }

    fn check(&self) -> PulseResult<()> {
        if self.fail {
            Err(redis_error("Store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FavoritesStore for MockFavoritesStore {
    async fn put(&self, user_id: &str, favorite: Favorite) -> PulseResult<()> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .insert((user_id.to_string(), favorite.event_id.clone()), favorite);
        Ok(())
    }

    async fn delete(&self, user_id: &str, event_id: &str) -> PulseResult<bool> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .remove(&(user_id.to_string(), event_id.to_string()))
            .is_some())
    }

    async fn contains(&self, user_id: &str, event_id: &str) -> PulseResult<bool> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .contains_key(&(user_id.to_string(), event_id.to_string())))
    }

    async fn list(&self, user_id: &str) -> PulseResult<Vec<Favorite>> {
        self.check()?;
        let mut favorites: Vec<Favorite> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|(_, favorite)| favorite.clone())
            .collect();
        favorites.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(favorites)
    }
}
