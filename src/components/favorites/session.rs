use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// The signed-in user, if any. Cloning shares the same session, and every
/// change of user is published to subscribers.
#[derive(Debug, Clone)]
pub struct UserSession {
    user_tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for UserSession {
    fn default() -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            user_tx: Arc::new(user_tx),
        }
    }
}

impl UserSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session already signed in as `user_id`
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let (user_tx, _) = watch::channel(Some(user_id.into()));
        Self {
            user_tx: Arc::new(user_tx),
        }
    }

    pub async fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        let changed = self.user_tx.send_if_modified(|current| {
            if current.as_deref() == Some(user_id.as_str()) {
                return false;
            }
            *current = Some(user_id.clone());
            true
        });
        if changed {
            info!("User {} signed in", user_id);
        }
    }

    pub async fn sign_out(&self) {
        let mut previous = None;
        self.user_tx.send_if_modified(|current| {
            previous = current.take();
            previous.is_some()
        });
        if let Some(user_id) = previous {
            info!("User {} signed out", user_id);
        }
    }

    pub async fn current_user(&self) -> Option<String> {
        self.user_tx.borrow().clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.user_tx.borrow().is_some()
    }

    /// Stream of user changes; `None` while signed out
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.user_tx.subscribe()
    }
}
