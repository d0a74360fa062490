use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Event API error: {0}")]
    #[diagnostic(code(localpulse::event_api))]
    EventApi(String),

    #[error("Distance Matrix API error: {0}")]
    #[diagnostic(code(localpulse::distance_matrix))]
    DistanceMatrix(String),

    #[error("Geocoding error: {0}")]
    #[diagnostic(code(localpulse::geocoding))]
    Geocoding(String),

    #[error("User not logged in")]
    #[diagnostic(code(localpulse::not_logged_in))]
    NotLoggedIn,

    #[error("Redis error: {0}")]
    #[diagnostic(code(localpulse::redis))]
    Redis(String),

    #[error("Invalid search filter: {0}")]
    #[diagnostic(code(localpulse::invalid_filter))]
    InvalidFilter(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(localpulse::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(localpulse::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(localpulse::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(localpulse::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(localpulse::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(localpulse::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Redis(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type PulseResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create event API errors
pub fn event_api_error(message: &str) -> Error {
    Error::EventApi(message.to_string())
}

/// Helper to create Distance Matrix errors
pub fn distance_matrix_error(message: &str) -> Error {
    Error::DistanceMatrix(message.to_string())
}

/// Helper to create geocoding errors
pub fn geocoding_error(message: &str) -> Error {
    Error::Geocoding(message.to_string())
}

/// Helper to create Redis errors
pub fn redis_error(message: &str) -> Error {
    Error::Redis(message.to_string())
}

/// Helper to create invalid filter errors
pub fn invalid_filter_error(message: &str) -> Error {
    Error::InvalidFilter(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
