use super::models::Favorite;
use super::session::UserSession;
use super::store::FavoritesStore;
use crate::components::events::models::Event;
use crate::error::{Error, PulseResult};
use crate::utils::state::{StateHolder, ViewState};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// What observers currently see, and which user it belongs to
struct Published {
    session_rx: watch::Receiver<Option<String>>,
    owner: Mutex<Option<String>>,
    favorites: StateHolder<ViewState<Vec<Favorite>>>,
    favorite_ids: StateHolder<HashSet<String>>,
}

impl Published {
    /// Hand the published state to the session's current user, clearing it
    /// if it belonged to someone else, and return that user
    async fn sync_user(&self) -> Option<String> {
        let mut owner = self.owner.lock().await;
        let current = self.session_rx.borrow().clone();
        if *owner != current {
            debug!("Favorites state switching from {:?} to {:?}", *owner, current);
            *owner = current.clone();
            self.favorite_ids.set(HashSet::new());
            self.favorites.set(ViewState::Loading);
        }
        current
    }

    /// Mutate the id set unless it has been handed to another user
    async fn update_ids_for(&self, user: &str, f: impl FnOnce(&mut HashSet<String>)) {
        let owner = self.owner.lock().await;
        if owner.as_deref() == Some(user) {
            self.favorite_ids.update(f);
        }
    }

    async fn set_ids_for(&self, user: &str, ids: HashSet<String>) {
        let owner = self.owner.lock().await;
        if owner.as_deref() == Some(user) {
            self.favorite_ids.set(ids);
        }
    }

    /// Load `user`'s list and publish it if they still own the state
    async fn reload(&self, store: &dyn FavoritesStore, user: Option<&str>) {
        let state = match user {
            Some(user_id) => match store.list(user_id).await {
                Ok(favorites) => ViewState::Ready(favorites),
                Err(e) => {
                    warn!("Failed to load favorites for {}: {}", user_id, e);
                    ViewState::Failed(e.to_string())
                }
            },
            None => ViewState::Failed(Error::NotLoggedIn.to_string()),
        };

        let owner = self.owner.lock().await;
        if owner.as_deref() == user {
            if let ViewState::Ready(favorites) = &state {
                self.favorite_ids
                    .set(favorites.iter().map(|f| f.event_id.clone()).collect());
            }
            self.favorites.set(state);
        } else {
            debug!("Discarding favorites loaded for {:?}", user);
        }
    }
}

/// Favorites of the signed-in user with live state for observers.
///
/// The published list and id set follow the session: when the user signs
/// out or another user signs in, both are reset and reloaded.
#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoritesStore>,
    session: UserSession,
    published: Arc<Published>,
}

impl FavoritesService {
    /// Create the service and start following session changes.
    /// Must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn FavoritesStore>, session: UserSession) -> Self {
        let session_rx = session.subscribe();
        let owner = session_rx.borrow().clone();

        let service = Self {
            store,
            session,
            published: Arc::new(Published {
                session_rx,
                owner: Mutex::new(owner),
                favorites: StateHolder::new(ViewState::Loading),
                favorite_ids: StateHolder::default(),
            }),
        };
        service.follow_session(service.session.subscribe());
        service
    }

    /// Reset and reload whenever the session's user changes. The task ends
    /// once every clone of the session is gone.
    fn follow_session(&self, mut user_rx: watch::Receiver<Option<String>>) {
        let store = Arc::clone(&self.store);
        let published = Arc::clone(&self.published);

        tokio::spawn(async move {
            while user_rx.changed().await.is_ok() {
                let user = published.sync_user().await;
                published.reload(store.as_ref(), user.as_deref()).await;
            }
        });
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    /// Sign in and publish the new user's favorites before returning
    pub async fn sign_in(&self, user_id: impl Into<String>) {
        self.session.sign_in(user_id).await;
        self.refresh().await;
    }

    /// Sign out and clear the published favorites before returning
    pub async fn sign_out(&self) {
        self.session.sign_out().await;
        self.refresh().await;
    }

    /// The current user, with the published state handed to them
    async fn require_user(&self) -> PulseResult<String> {
        self.published.sync_user().await.ok_or(Error::NotLoggedIn)
    }

    /// Live list of the current user's favorites
    pub fn favorites(&self) -> watch::Receiver<ViewState<Vec<Favorite>>> {
        self.published.favorites.subscribe()
    }

    /// Live set of event ids known to be favorites
    pub fn favorite_ids(&self) -> watch::Receiver<HashSet<String>> {
        self.published.favorite_ids.subscribe()
    }

    /// Reload the current user's list and publish it
    pub async fn refresh(&self) {
        let user = self.published.sync_user().await;
        self.published
            .reload(self.store.as_ref(), user.as_deref())
            .await;
    }

    /// Whether the event is saved; false when signed out or on store errors
    pub async fn is_favorite(&self, event_id: &str) -> bool {
        let Some(user_id) = self.session.current_user().await else {
            return false;
        };
        self.is_favorite_for(&user_id, event_id).await
    }

    async fn is_favorite_for(&self, user_id: &str, event_id: &str) -> bool {
        match self.store.contains(user_id, event_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Favorite check for {} failed: {}", event_id, e);
                false
            }
        }
    }

    /// Save the event for the current user
    pub async fn add_favorite(&self, event: &Event) -> PulseResult<()> {
        let user_id = self.require_user().await?;

        self.store
            .put(&user_id, Favorite::from_event(&user_id, event))
            .await?;
        info!("Added favorite {} for {}", event.id, user_id);

        self.published
            .update_ids_for(&user_id, |ids| {
                ids.insert(event.id.clone());
            })
            .await;
        self.refresh().await;
        Ok(())
    }

    /// Remove the event from the current user's favorites
    pub async fn remove_favorite(&self, event_id: &str) -> PulseResult<()> {
        let user_id = self.require_user().await?;

        let removed = self.store.delete(&user_id, event_id).await?;
        info!("Removed favorite {} for {} (existed: {})", event_id, user_id, removed);

        self.published
            .update_ids_for(&user_id, |ids| {
                ids.remove(event_id);
            })
            .await;
        self.refresh().await;
        Ok(())
    }

    /// Flip the favorite status and return the new one.
    ///
    /// The keyed delete decides the outcome, so two concurrent toggles never
    /// leave duplicate records behind.
    pub async fn toggle_favorite(&self, event: &Event) -> PulseResult<bool> {
        let user_id = self.require_user().await?;

        let now_favorite = if self.store.delete(&user_id, &event.id).await? {
            false
        } else {
            self.store
                .put(&user_id, Favorite::from_event(&user_id, event))
                .await?;
            true
        };

        self.published
            .update_ids_for(&user_id, |ids| {
                if now_favorite {
                    ids.insert(event.id.clone());
                } else {
                    ids.remove(&event.id);
                }
            })
            .await;
        self.refresh().await;
        Ok(now_favorite)
    }

    /// Mark the event in the id set if it is saved
    pub async fn check_favorite_status(&self, event_id: &str) {
        let Ok(user_id) = self.require_user().await else {
            return;
        };

        if self.is_favorite_for(&user_id, event_id).await {
            self.published
                .update_ids_for(&user_id, |ids| {
                    ids.insert(event_id.to_string());
                })
                .await;
        }
    }

    /// Recompute the id set for a list of events
    pub async fn refresh_favorite_statuses(&self, events: &[Event]) {
        let Ok(user_id) = self.require_user().await else {
            return;
        };

        let checks = events.iter().map(|event| {
            let user_id = user_id.as_str();
            async move {
                self.is_favorite_for(user_id, &event.id)
                    .await
                    .then(|| event.id.clone())
            }
        });

        let ids: HashSet<String> = join_all(checks).await.into_iter().flatten().collect();
        self.published.set_ids_for(&user_id, ids).await;
    }
}
