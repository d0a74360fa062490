use super::models::{
    DateStart, DiscoveryEvent, DiscoveryResponse, Event, EventImage, Venue, VenueLocation,
};
use crate::error::{event_api_error, PulseResult};
use crate::utils::geo::Coordinates;

pub const VENUE_PLACEHOLDER: &str = "TBA";
pub const ADDRESS_PLACEHOLDER: &str = "Address not available";
pub const DATE_PLACEHOLDER: &str = "Date TBA";

/// Parse a search response body into normalized events
pub fn parse_search_response(body: &str) -> PulseResult<Vec<Event>> {
    let response: DiscoveryResponse = serde_json::from_str(body)
        .map_err(|e| event_api_error(&format!("Failed to parse events response: {}", e)))?;

    Ok(response
        .embedded
        .map(|embedded| embedded.events.into_iter().map(normalize_event).collect())
        .unwrap_or_default())
}

/// Parse a single-event response body
pub fn parse_event_response(body: &str) -> PulseResult<Event> {
    let event: DiscoveryEvent = serde_json::from_str(body)
        .map_err(|e| event_api_error(&format!("Failed to parse event response: {}", e)))?;
    Ok(normalize_event(event))
}

/// Convert an API event into our representation
pub fn normalize_event(event: DiscoveryEvent) -> Event {
    let venue = event
        .embedded
        .as_ref()
        .and_then(|embedded| embedded.venues.as_ref())
        .and_then(|venues| venues.first());

    Event {
        image: best_image(event.images.as_deref()),
        start_time: start_time(event.dates.as_ref().and_then(|d| d.start.as_ref())),
        venue_name: venue
            .and_then(|v| v.name.clone())
            .unwrap_or_else(|| VENUE_PLACEHOLDER.to_string()),
        venue_address: venue_address(venue),
        coordinates: venue
            .and_then(|v| v.location.as_ref())
            .and_then(parse_coordinates),
        description: description(event.info.as_deref(), event.please_note.as_deref()),
        id: event.id,
        name: event.name,
        url: event.url,
    }
}

/// URL of the widest image; images without a width count as zero
pub fn best_image(images: Option<&[EventImage]>) -> Option<String> {
    // rev() so the first of equally wide images wins
    images?
        .iter()
        .rev()
        .max_by_key(|image| image.width.unwrap_or(0))
        .and_then(|image| image.url.clone())
}

fn venue_address(venue: Option<&Venue>) -> String {
    let parts: Vec<&str> = venue
        .map(|v| {
            [
                v.address.as_ref().and_then(|a| a.line1.as_deref()),
                v.city.as_ref().and_then(|c| c.name.as_deref()),
                v.state.as_ref().and_then(|s| s.name.as_deref()),
            ]
            .into_iter()
            .flatten()
            .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        ADDRESS_PLACEHOLDER.to_string()
    } else {
        parts.join(", ")
    }
}

fn start_time(start: Option<&DateStart>) -> String {
    let Some(start) = start else {
        return DATE_PLACEHOLDER.to_string();
    };

    match (start.local_date.as_deref(), start.local_time.as_deref()) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        (Some(date), None) => date.to_string(),
        (None, Some(time)) => time.to_string(),
        (None, None) => String::new(),
    }
}

fn description(info: Option<&str>, please_note: Option<&str>) -> Option<String> {
    match (info, please_note) {
        (Some(info), Some(note)) => Some(format!("{}\n\nNote: {}", info, note)),
        (Some(info), None) => Some(info.to_string()),
        (None, Some(note)) => Some(format!("Note: {}", note)),
        (None, None) => None,
    }
}

fn parse_coordinates(location: &VenueLocation) -> Option<Coordinates> {
    let latitude = location.latitude.as_deref()?.trim().parse::<f64>().ok()?;
    let longitude = location.longitude.as_deref()?.trim().parse::<f64>().ok()?;
    Some(Coordinates::new(latitude, longitude))
}
