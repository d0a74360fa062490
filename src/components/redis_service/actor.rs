use crate::components::events::models::Event;
use crate::components::favorites::models::Favorite;
use crate::config::Config;
use crate::error::{redis_error, PulseResult};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client as RedisClient};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

// Redis key constants
pub mod keys {
    pub const FAVORITES_PREFIX: &str = "favorites:";
    pub const EVENTS_SNAPSHOT_PREFIX: &str = "events:snapshot:";

    /// Hash holding one user's favorites, keyed by event id
    pub fn favorites(user_id: &str) -> String {
        format!("{}{}", FAVORITES_PREFIX, user_id)
    }

    /// Last synced event list for a city
    pub fn events_snapshot(city: &str) -> String {
        format!("{}{}", EVENTS_SNAPSHOT_PREFIX, city.to_lowercase())
    }
}

/// The Redis actor that processes messages
pub struct RedisActor {
    client: RedisClient,
    connection: Option<ConnectionManager>,
    command_rx: mpsc::Receiver<RedisCommand>,
}

/// Commands that can be sent to the Redis actor
pub enum RedisCommand {
    SaveSnapshot(String, Vec<Event>, mpsc::Sender<PulseResult<()>>),
    GetSnapshot(String, mpsc::Sender<PulseResult<Vec<Event>>>),
    PutFavorite(String, Favorite, mpsc::Sender<PulseResult<()>>),
    DeleteFavorite(String, String, mpsc::Sender<PulseResult<bool>>),
    HasFavorite(String, String, mpsc::Sender<PulseResult<bool>>),
    ListFavorites(String, mpsc::Sender<PulseResult<Vec<Favorite>>>),
    Shutdown,
}

/// Handle for communicating with the Redis actor
#[derive(Clone)]
pub struct RedisActorHandle {
    command_tx: mpsc::Sender<RedisCommand>,
}

impl RedisActorHandle {
    /// Create a handle with no actor behind it; every request fails
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<PulseResult<T>>) -> RedisCommand,
    ) -> PulseResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(build(response_tx))
            .await
            .map_err(|e| redis_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| redis_error("Response channel closed"))?
    }

    /// Save the last synced events for a city
    pub async fn save_snapshot(&self, city: impl Into<String>, events: Vec<Event>) -> PulseResult<()> {
        let city = city.into();
        self.request(|tx| RedisCommand::SaveSnapshot(city, events, tx))
            .await
    }

    /// Get the last synced events for a city
    pub async fn get_snapshot(&self, city: impl Into<String>) -> PulseResult<Vec<Event>> {
        let city = city.into();
        self.request(|tx| RedisCommand::GetSnapshot(city, tx)).await
    }

    /// Insert or replace a favorite record
    pub async fn put_favorite(&self, user_id: impl Into<String>, favorite: Favorite) -> PulseResult<()> {
        let user_id = user_id.into();
        self.request(|tx| RedisCommand::PutFavorite(user_id, favorite, tx))
            .await
    }

    /// Delete a favorite record, returning whether one existed
    pub async fn delete_favorite(
        &self,
        user_id: impl Into<String>,
        event_id: impl Into<String>,
    ) -> PulseResult<bool> {
        let (user_id, event_id) = (user_id.into(), event_id.into());
        self.request(|tx| RedisCommand::DeleteFavorite(user_id, event_id, tx))
            .await
    }

    pub async fn has_favorite(
        &self,
        user_id: impl Into<String>,
        event_id: impl Into<String>,
    ) -> PulseResult<bool> {
        let (user_id, event_id) = (user_id.into(), event_id.into());
        self.request(|tx| RedisCommand::HasFavorite(user_id, event_id, tx))
            .await
    }

    pub async fn list_favorites(&self, user_id: impl Into<String>) -> PulseResult<Vec<Favorite>> {
        let user_id = user_id.into();
        self.request(|tx| RedisCommand::ListFavorites(user_id, tx))
            .await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> PulseResult<()> {
        let _ = self.command_tx.send(RedisCommand::Shutdown).await;
        Ok(())
    }
}

impl RedisActor {
    /// Create a new actor and return its handle
    pub async fn new(config: Arc<RwLock<Config>>) -> PulseResult<(Self, RedisActorHandle)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let redis_url = {
            let config_guard = config.read().await;
            config_guard.redis_url.clone()
        };

        let client = RedisClient::open(redis_url.as_str())
            .map_err(|e| redis_error(&format!("Failed to create Redis client: {}", e)))?;

        let actor = Self {
            client,
            connection: None,
            command_rx,
        };

        let handle = RedisActorHandle { command_tx };

        Ok((actor, handle))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Redis actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RedisCommand::SaveSnapshot(city, events, response_tx) => {
                    let result = self.save_snapshot(&city, &events).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::GetSnapshot(city, response_tx) => {
                    let result = self.get_snapshot(&city).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::PutFavorite(user_id, favorite, response_tx) => {
                    let result = self.put_favorite(&user_id, &favorite).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::DeleteFavorite(user_id, event_id, response_tx) => {
                    let result = self.delete_favorite(&user_id, &event_id).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::HasFavorite(user_id, event_id, response_tx) => {
                    let result = self.has_favorite(&user_id, &event_id).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::ListFavorites(user_id, response_tx) => {
                    let result = self.list_favorites(&user_id).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::Shutdown => {
                    info!("Redis actor shutting down");
                    break;
                }
            }
        }

        info!("Redis actor shut down");
    }

    /// Get a redis connection, connecting on first use
    async fn connection(&mut self) -> PulseResult<ConnectionManager> {
        if let Some(conn) = &self.connection {
            return Ok(conn.clone());
        }

        let conn = ConnectionManager::new(self.client.clone())
            .await
            .map_err(|e| redis_error(&format!("Failed to connect to Redis: {}", e)))?;
        self.connection = Some(conn.clone());
        Ok(conn)
    }

    async fn save_snapshot(&mut self, city: &str, events: &[Event]) -> PulseResult<()> {
        let mut conn = self.connection().await?;

        let events_json = serde_json::to_string(events)?;

        () = conn
            .set(keys::events_snapshot(city), events_json)
            .await
            .map_err(|e| redis_error(&format!("Failed to save snapshot: {}", e)))?;

        debug!("Saved snapshot of {} events for {}", events.len(), city);
        Ok(())
    }

    async fn get_snapshot(&mut self, city: &str) -> PulseResult<Vec<Event>> {
        let mut conn = self.connection().await?;

        let events_json: Option<String> = conn
            .get(keys::events_snapshot(city))
            .await
            .map_err(|e| redis_error(&format!("Failed to read snapshot: {}", e)))?;

        match events_json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn put_favorite(&mut self, user_id: &str, favorite: &Favorite) -> PulseResult<()> {
        let mut conn = self.connection().await?;

        let favorite_json = serde_json::to_string(favorite)?;

        // HSET on the event id field is a keyed upsert
        let _: i64 = conn
            .hset(keys::favorites(user_id), &favorite.event_id, favorite_json)
            .await
            .map_err(|e| redis_error(&format!("Failed to save favorite: {}", e)))?;

        Ok(())
    }

    async fn delete_favorite(&mut self, user_id: &str, event_id: &str) -> PulseResult<bool> {
        let mut conn = self.connection().await?;

        let removed: i64 = conn
            .hdel(keys::favorites(user_id), event_id)
            .await
            .map_err(|e| redis_error(&format!("Failed to delete favorite: {}", e)))?;

        Ok(removed > 0)
    }

    async fn has_favorite(&mut self, user_id: &str, event_id: &str) -> PulseResult<bool> {
        let mut conn = self.connection().await?;

        conn.hexists(keys::favorites(user_id), event_id)
            .await
            .map_err(|e| redis_error(&format!("Failed to check favorite: {}", e)))
    }

    async fn list_favorites(&mut self, user_id: &str) -> PulseResult<Vec<Favorite>> {
        let mut conn = self.connection().await?;

        let entries: HashMap<String, String> = conn
            .hgetall(keys::favorites(user_id))
            .await
            .map_err(|e| redis_error(&format!("Failed to list favorites: {}", e)))?;

        let mut favorites = Vec::with_capacity(entries.len());
        for (event_id, json) in entries {
            match serde_json::from_str::<Favorite>(&json) {
                Ok(favorite) => favorites.push(favorite),
                Err(e) => warn!("Skipping unreadable favorite {} for {}: {}", event_id, user_id, e),
            }
        }

        // Newest first
        favorites.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(favorites)
    }
}
