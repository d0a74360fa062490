use serde::{Deserialize, Serialize};
use std::fmt;

/// Average driving speed used for straight-line estimates
pub const CAR_SPEED_KMH: f64 = 60.0;
/// Average walking speed used for straight-line estimates
pub const WALKING_SPEED_KMH: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
}

impl TravelMode {
    /// Value of the Distance Matrix `mode` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One routed origin-destination result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_meters: u64,
    pub distance_text: String,
    pub duration_seconds: u64,
    pub duration_text: String,
}

impl RouteLeg {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }

    /// Whole minutes, truncated
    pub fn duration_minutes(&self) -> u64 {
        self.duration_seconds / 60
    }
}

/// Where a travel estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelSource {
    /// Road distances from the routing service
    Routed,
    /// Straight-line distance at average speeds
    Estimated,
}

/// Distance and travel times from the current location to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelInfo {
    pub distance_km: f64,
    pub distance_text: String,
    pub car_time_minutes: u64,
    pub car_time_text: String,
    pub walking_time_minutes: u64,
    pub walking_time_text: String,
    pub source: TravelSource,
}

impl TravelInfo {
    pub fn is_approximate(&self) -> bool {
        self.source == TravelSource::Estimated
    }
}
