use super::models::Favorite;
use crate::components::redis_service::RedisActorHandle;
use crate::error::PulseResult;
use async_trait::async_trait;

/// Remote store of per-user favorites, keyed by (user, event)
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Insert or replace the record for `favorite.event_id`
    async fn put(&self, user_id: &str, favorite: Favorite) -> PulseResult<()>;

    /// Delete the record; true if one existed
    async fn delete(&self, user_id: &str, event_id: &str) -> PulseResult<bool>;

    async fn contains(&self, user_id: &str, event_id: &str) -> PulseResult<bool>;

    /// All records for the user, newest first
    async fn list(&self, user_id: &str) -> PulseResult<Vec<Favorite>>;
}

/// Favorites kept in Redis hashes through the Redis actor
#[derive(Clone)]
pub struct RedisFavoritesStore {
    redis_handle: RedisActorHandle,
}

impl RedisFavoritesStore {
    pub fn new(redis_handle: RedisActorHandle) -> Self {
        Self { redis_handle }
    }
}

#[async_trait]
impl FavoritesStore for RedisFavoritesStore {
    async fn put(&self, user_id: &str, favorite: Favorite) -> PulseResult<()> {
        self.redis_handle.put_favorite(user_id, favorite).await
    }

    async fn delete(&self, user_id: &str, event_id: &str) -> PulseResult<bool> {
        self.redis_handle.delete_favorite(user_id, event_id).await
    }

    async fn contains(&self, user_id: &str, event_id: &str) -> PulseResult<bool> {
        self.redis_handle.has_favorite(user_id, event_id).await
    }

    async fn list(&self, user_id: &str) -> PulseResult<Vec<Favorite>> {
        self.redis_handle.list_favorites(user_id).await
    }
}
