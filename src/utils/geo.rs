use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_km(self, other)
    }
}

/// Formats as `lat,lng`, the shape Google Maps endpoints expect
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Calculate distance between two coordinates using the Haversine formula.
/// Returns distance in kilometers.
pub fn haversine_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Check if a point lies within `radius_km` of a center
pub fn is_within_radius(point: &Coordinates, center: &Coordinates, radius_km: f64) -> bool {
    haversine_km(point, center) <= radius_km
}

/// Human-friendly distance: meters below 1 km, one decimal below 10 km
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{}m", (distance_km * 1000.0) as i64)
    } else if distance_km < 10.0 {
        format!("{:.1}km", distance_km)
    } else {
        format!("{}km", distance_km as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: Coordinates = Coordinates {
        latitude: 51.5074,
        longitude: -0.1278,
    };
    const PARIS: Coordinates = Coordinates {
        latitude: 48.8566,
        longitude: 2.3522,
    };

    #[test]
    fn test_haversine_london_paris() {
        let distance = haversine_km(&LONDON, &PARIS);
        // Roughly 343 km
        assert!((distance - 343.5).abs() < 3.0, "got {}", distance);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let there = haversine_km(&LONDON, &PARIS);
        let back = haversine_km(&PARIS, &LONDON);
        assert!((there - back).abs() < 1e-9);
        assert_eq!(haversine_km(&LONDON, &LONDON), 0.0);
    }

    #[test]
    fn test_haversine_quarter_meridian() {
        // Equator to pole is a quarter of the circumference
        let equator = Coordinates::new(0.0, 0.0);
        let pole = Coordinates::new(90.0, 0.0);
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM / 2.0;
        let distance = haversine_km(&equator, &pole);
        assert!(((distance - expected) / expected).abs() < 1e-6);
    }

    #[test]
    fn test_within_radius() {
        let center = Coordinates::new(44.4268, 26.1025); // Bucharest
        let nearby = Coordinates::new(44.43, 26.10);
        assert!(is_within_radius(&nearby, &center, 10.0));
        assert!(!is_within_radius(&PARIS, &center, 10.0));
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.25), "250m");
        assert_eq!(format_distance(3.456), "3.5km");
        assert_eq!(format_distance(42.9), "42km");
    }

    #[test]
    fn test_display_as_lat_lng() {
        assert_eq!(Coordinates::new(44.5, 26.25).to_string(), "44.5,26.25");
    }
}
