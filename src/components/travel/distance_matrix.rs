use super::models::{RouteLeg, TravelMode};
use crate::config::Config;
use crate::error::{distance_matrix_error, PulseResult};
use crate::utils::geo::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Road routing between two points
#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> PulseResult<RouteLeg>;
}

/// Google Distance Matrix API client
#[derive(Clone)]
pub struct DistanceMatrixClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DistanceMatrixClient {
    pub fn new(config: &Config) -> PulseResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| distance_matrix_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.distance_matrix_url.clone(),
            api_key: config.google_maps_api_key.clone(),
        })
    }
}

#[async_trait]
impl RoutingService for DistanceMatrixClient {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> PulseResult<RouteLeg> {
        let url = Url::parse_with_params(
            &self.endpoint,
            [
                ("origins", origin.to_string()),
                ("destinations", destination.to_string()),
                ("mode", mode.as_str().to_string()),
                ("key", self.api_key.clone()),
            ],
        )
        .map_err(|e| distance_matrix_error(&format!("Failed to parse URL: {}", e)))?;

        debug!("Distance Matrix request: {} -> {} ({})", origin, destination, mode);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| distance_matrix_error(&format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            if status == reqwest::StatusCode::FORBIDDEN {
                warn!("Distance Matrix returned 403; the API may not be enabled for this key");
            }
            return Err(distance_matrix_error(&format!(
                "HTTP {} - {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| distance_matrix_error(&format!("Failed to parse response: {}", e)))?;

        parse_distance_matrix(&body)
    }
}

/// Extract the single origin/destination element from a response
pub fn parse_distance_matrix(body: &Value) -> PulseResult<RouteLeg> {
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .ok_or_else(|| distance_matrix_error("No status in response"))?;

    if status != "OK" {
        let message = body
            .get("error_message")
            .and_then(|m| m.as_str())
            .unwrap_or("no error message");
        return Err(distance_matrix_error(&format!("Status {}: {}", status, message)));
    }

    let element = body
        .get("rows")
        .and_then(|rows| rows.as_array())
        .and_then(|rows| rows.first())
        .and_then(|row| row.get("elements"))
        .and_then(|elements| elements.as_array())
        .and_then(|elements| elements.first())
        .ok_or_else(|| distance_matrix_error("No distance data in response"))?;

    let element_status = element
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("UNKNOWN");
    if element_status != "OK" {
        return Err(distance_matrix_error(&format!("Element status {}", element_status)));
    }

    let distance = element.get("distance");
    let duration = element.get("duration");

    let distance_meters = distance
        .and_then(|d| d.get("value"))
        .and_then(|v| v.as_u64())
        .ok_or_else(|| distance_matrix_error("Missing distance value"))?;
    let duration_seconds = duration
        .and_then(|d| d.get("value"))
        .and_then(|v| v.as_u64())
        .ok_or_else(|| distance_matrix_error("Missing duration value"))?;

    let distance_text = distance
        .and_then(|d| d.get("text"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{} km", distance_meters as f64 / 1000.0));
    let duration_text = duration
        .and_then(|d| d.get("text"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{} min", duration_seconds / 60));

    Ok(RouteLeg {
        distance_meters,
        distance_text,
        duration_seconds,
        duration_text,
    })
}
