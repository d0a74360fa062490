use super::distance_matrix::RoutingService;
use super::models::{TravelInfo, TravelMode, TravelSource, CAR_SPEED_KMH, WALKING_SPEED_KMH};
use crate::utils::geo::{haversine_km, Coordinates};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Computes travel info, preferring routed distances
#[derive(Clone)]
pub struct TravelEstimator {
    routing: Arc<dyn RoutingService>,
}

impl TravelEstimator {
    pub fn new(routing: Arc<dyn RoutingService>) -> Self {
        Self { routing }
    }

    /// Travel info between two points, `None` when either is unknown.
    ///
    /// Any routing failure falls back to a straight-line estimate.
    pub async fn estimate(
        &self,
        origin: Option<Coordinates>,
        destination: Option<Coordinates>,
    ) -> Option<TravelInfo> {
        let (Some(origin), Some(destination)) = (origin, destination) else {
            debug!("Cannot calculate travel info: missing location data");
            return None;
        };

        Some(self.estimate_between(origin, destination).await)
    }

    /// Travel info between two known points
    pub async fn estimate_between(&self, origin: Coordinates, destination: Coordinates) -> TravelInfo {
        let (driving, walking) = tokio::join!(
            self.routing.route(origin, destination, TravelMode::Driving),
            self.routing.route(origin, destination, TravelMode::Walking),
        );

        match (driving, walking) {
            (Ok(driving), Ok(walking)) => {
                info!(
                    "Routed travel info: driving {} in {}, walking {}",
                    driving.distance_text, driving.duration_text, walking.duration_text
                );
                TravelInfo {
                    distance_km: driving.distance_km(),
                    distance_text: driving.distance_text.clone(),
                    car_time_minutes: driving.duration_minutes(),
                    car_time_text: driving.duration_text.clone(),
                    walking_time_minutes: walking.duration_minutes(),
                    walking_time_text: walking.duration_text,
                    source: TravelSource::Routed,
                }
            }
            (driving, walking) => {
                if let Err(e) = &driving {
                    warn!("Driving route unavailable, using straight-line estimate: {}", e);
                }
                if let Err(e) = &walking {
                    warn!("Walking route unavailable, using straight-line estimate: {}", e);
                }
                straight_line_estimate(origin, destination)
            }
        }
    }
}

/// Approximate travel info from the great-circle distance at average speeds.
/// Texts carry a `~` prefix.
pub fn straight_line_estimate(origin: Coordinates, destination: Coordinates) -> TravelInfo {
    let distance = haversine_km(&origin, &destination);
    let car_time_minutes = minutes_at(distance, CAR_SPEED_KMH);
    let walking_time_minutes = minutes_at(distance, WALKING_SPEED_KMH);

    TravelInfo {
        distance_km: distance,
        distance_text: format!("~{:.1} km", distance),
        car_time_minutes,
        car_time_text: format!("~{} min", car_time_minutes),
        walking_time_minutes,
        walking_time_text: format!("~{} min", walking_time_minutes),
        source: TravelSource::Estimated,
    }
}

fn minutes_at(distance_km: f64, speed_kmh: f64) -> u64 {
    (distance_km / speed_kmh * 60.0).round() as u64
}
