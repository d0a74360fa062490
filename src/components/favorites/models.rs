use crate::components::events::models::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's saved event, denormalized for listing without a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub event_name: String,
    pub event_image: Option<String>,
    pub event_url: String,
    pub timestamp: DateTime<Utc>,
}

impl Favorite {
    /// Build the record for `user_id` saving `event` now
    pub fn from_event(user_id: &str, event: &Event) -> Self {
        Self {
            id: Self::record_id(user_id, &event.id),
            user_id: user_id.to_string(),
            event_id: event.id.clone(),
            event_name: event.name.clone(),
            event_image: event.image.clone(),
            event_url: event.url.clone(),
            timestamp: Utc::now(),
        }
    }

    /// One record per (user, event) pair
    pub fn record_id(user_id: &str, event_id: &str) -> String {
        format!("{}:{}", user_id, event_id)
    }
}
