use crate::config::Config;
use crate::error::{geocoding_error, PulseResult};
use crate::utils::geo::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Resolves a place name to at most one coordinate
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, place: &str) -> PulseResult<Option<Coordinates>>;
}

/// Google Geocoding API client
#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(config: &Config) -> PulseResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| geocoding_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.geocoding_url.clone(),
            api_key: config.google_maps_api_key.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn lookup(&self, place: &str) -> PulseResult<Option<Coordinates>> {
        let url = Url::parse_with_params(
            &self.endpoint,
            [("address", place), ("key", self.api_key.as_str())],
        )
        .map_err(|e| geocoding_error(&format!("Failed to parse URL: {}", e)))?;

        debug!("Geocoding {}", place);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| geocoding_error(&format!("Failed to geocode {}: {}", place, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(geocoding_error(&format!(
                "Failed to geocode {}: HTTP {} - {}",
                place, status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| geocoding_error(&format!("Failed to parse geocoding response: {}", e)))?;

        parse_geocode_response(&body)
    }
}

/// First result's location; `ZERO_RESULTS` is a clean miss
pub fn parse_geocode_response(body: &Value) -> PulseResult<Option<Coordinates>> {
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .ok_or_else(|| geocoding_error("No status in response"))?;

    match status {
        "OK" => {}
        "ZERO_RESULTS" => return Ok(None),
        other => {
            let message = body
                .get("error_message")
                .and_then(|m| m.as_str())
                .unwrap_or("no error message");
            return Err(geocoding_error(&format!("Status {}: {}", other, message)));
        }
    }

    let location = body
        .get("results")
        .and_then(|r| r.as_array())
        .and_then(|results| results.first())
        .and_then(|result| result.get("geometry"))
        .and_then(|geometry| geometry.get("location"));

    let coordinates = location.and_then(|loc| {
        let lat = loc.get("lat").and_then(|v| v.as_f64())?;
        let lng = loc.get("lng").and_then(|v| v.as_f64())?;
        Some(Coordinates::new(lat, lng))
    });

    Ok(coordinates)
}
