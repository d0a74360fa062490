use tokio::sync::watch;

/// Loading/success/error state of an operation as seen by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// The value if the state is `Ready`
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Mutable observable value; readers subscribe to a read-only stream.
#[derive(Debug)]
pub struct StateHolder<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Read-only stream of values
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for StateHolder<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let holder = StateHolder::new(ViewState::<u32>::Loading);
        let mut rx = holder.subscribe();

        holder.set(ViewState::Ready(7));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ViewState::Ready(7));

        holder.update(|state| *state = ViewState::Failed("boom".to_string()));
        assert_eq!(holder.get().error(), Some("boom"));
    }
}
