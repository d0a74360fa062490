mod cache;
pub mod client;

pub use cache::GeocodingService;
pub use client::{Geocoder, GoogleGeocoder};
