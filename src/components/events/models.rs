use crate::utils::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// Normalized event as shown to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub start_time: String,
    pub venue_name: String,
    pub venue_address: String,
    /// Venue position; latitude and longitude always travel together
    pub coordinates: Option<Coordinates>,
}

impl Event {
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }

    /// Whether location-based features apply to this event
    pub fn has_location(&self) -> bool {
        self.coordinates.is_some()
    }
}

/// User-supplied search filters; empty fields are ignored
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub city: String,
    pub keyword: String,
    pub category: String,
    pub start_date: String,
    pub end_date: String,
}

impl SearchFilters {
    /// Filters that only restrict the city
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Default::default()
        }
    }
}

// Discovery API v2 response shapes, reduced to the fields we read.

#[derive(Debug, Deserialize, Default)]
pub struct DiscoveryResponse {
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<DiscoveryEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEvent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub images: Option<Vec<EventImage>>,
    pub dates: Option<EventDates>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<EventEmbedded>,
    pub info: Option<String>,
    pub please_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventImage {
    pub url: Option<String>,
    pub width: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EventDates {
    pub start: Option<DateStart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateStart {
    pub local_date: Option<String>,
    pub local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventEmbedded {
    pub venues: Option<Vec<Venue>>,
}

#[derive(Debug, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub address: Option<VenueAddress>,
    pub city: Option<NamedField>,
    pub state: Option<NamedField>,
    pub location: Option<VenueLocation>,
}

#[derive(Debug, Deserialize)]
pub struct VenueAddress {
    pub line1: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NamedField {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VenueLocation {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

