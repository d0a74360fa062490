use crate::error::{config_error, env_error, PulseResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Ticketmaster Discovery API v2 root
pub const TICKETMASTER_BASE_URL: &str = "https://app.ticketmaster.com/discovery/v2";
/// Google Distance Matrix endpoint
pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
/// Google Geocoding endpoint
pub const GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub const DEFAULT_CITY: &str = "Bucharest";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
/// Twelve hours between background syncs
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 12 * 60 * 60;
pub const DEFAULT_SYNC_RETRY_SECS: u64 = 300;
pub const DEFAULT_GEOCODE_CACHE_CAPACITY: u64 = 256;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const COMPONENTS_FILE: &str = "config/components.toml";

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ticketmaster Discovery API key
    pub ticketmaster_api_key: String,
    /// Google Maps key used for Distance Matrix and Geocoding
    pub google_maps_api_key: String,
    pub ticketmaster_base_url: String,
    pub distance_matrix_url: String,
    pub geocoding_url: String,
    /// Redis connection URL
    pub redis_url: String,
    /// City searched when no filter is given
    pub default_city: String,
    /// Number of events requested per search
    pub page_size: u32,
    /// Seconds between background event syncs
    pub sync_interval_secs: u64,
    /// Seconds before a failed sync is retried
    pub sync_retry_secs: u64,
    /// Maximum number of cached city lookups
    pub geocode_cache_capacity: u64,
    pub http_timeout_secs: u64,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> PulseResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let ticketmaster_api_key =
            env::var("TICKETMASTER_API_KEY").map_err(|_| env_error("TICKETMASTER_API_KEY"))?;
        let google_maps_api_key =
            env::var("GOOGLE_MAPS_API_KEY").map_err(|_| env_error("GOOGLE_MAPS_API_KEY"))?;

        let ticketmaster_base_url = env_or("TICKETMASTER_BASE_URL", TICKETMASTER_BASE_URL);
        let distance_matrix_url = env_or("DISTANCE_MATRIX_URL", DISTANCE_MATRIX_URL);
        let geocoding_url = env_or("GEOCODING_URL", GEOCODING_URL);
        let redis_url = env_or("REDIS_URL", DEFAULT_REDIS_URL);
        let default_city = env_or("DEFAULT_CITY", DEFAULT_CITY);

        // Parse numeric values
        let page_size = parse_env("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let sync_interval_secs = parse_env("SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)?;
        let sync_retry_secs = parse_env("SYNC_RETRY_SECS", DEFAULT_SYNC_RETRY_SECS)?;
        let geocode_cache_capacity =
            parse_env("GEOCODE_CACHE_CAPACITY", DEFAULT_GEOCODE_CACHE_CAPACITY)?;
        let http_timeout_secs = parse_env("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        // Initialize default components
        let mut components = Self::default_components();

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string(COMPONENTS_FILE) {
            let file_components = toml::from_str::<HashMap<String, bool>>(&content)?;
            // Merge with defaults
            for (key, value) in file_components {
                components.insert(key, value);
            }
        }

        Ok(Config {
            ticketmaster_api_key,
            google_maps_api_key,
            ticketmaster_base_url,
            distance_matrix_url,
            geocoding_url,
            redis_url,
            default_city,
            page_size,
            sync_interval_secs,
            sync_retry_secs,
            geocode_cache_capacity,
            http_timeout_secs,
            components,
        })
    }

    /// Components enabled when no config file says otherwise
    pub fn default_components() -> HashMap<String, bool> {
        let mut components = HashMap::new();
        components.insert("event_sync".to_string(), true);
        components
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> PulseResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    fn save_components(&self) -> PulseResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write(COMPONENTS_FILE, toml_str)?;

        Ok(())
    }
}

fn env_or(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Read an optional numeric variable, rejecting values that do not parse
fn parse_env<T: FromStr>(var: &str, default: T) -> PulseResult<T> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| config_error(&format!("Invalid {} format: {}", var, raw))),
        Err(_) => Ok(default),
    }
}
