use super::client::Geocoder;
use crate::utils::geo::Coordinates;
use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, warn};

/// Memoizing front for a geocoder.
///
/// Keys are exact city strings. Misses and lookup failures are cached as
/// `None`, so a name is looked up at most once while it stays cached.
/// Concurrent first lookups of one name share a single geocoder call.
#[derive(Clone)]
pub struct GeocodingService {
    geocoder: Arc<dyn Geocoder>,
    cache: Cache<String, Option<Coordinates>>,
}

impl GeocodingService {
    pub fn new(geocoder: Arc<dyn Geocoder>, capacity: u64) -> Self {
        Self {
            geocoder,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Coordinates for a city name, if the geocoder knows it
    pub async fn get_coordinates(&self, city_name: &str) -> Option<Coordinates> {
        let geocoder = Arc::clone(&self.geocoder);
        let key = city_name.to_string();

        self.cache
            .get_with(key, async move {
                debug!("Geocode cache miss for {}", city_name);
                match geocoder.lookup(city_name).await {
                    Ok(coordinates) => coordinates,
                    Err(e) => {
                        warn!("Error geocoding {}: {}", city_name, e);
                        None
                    }
                }
            })
            .await
    }

    /// Drop every cached lookup
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}
