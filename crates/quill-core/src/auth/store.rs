//! Observable authentication state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::domain::{AuthState, UserProfile};

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// Handle returned by [`AuthStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owned container for the signed-in state.
///
/// Shared by `Arc` with whoever needs it. Only `login` and `logout` mutate it,
/// and each mutation notifies every subscriber synchronously, outside the lock.
pub struct AuthStore {
    state: RwLock<AuthState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl AuthStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    pub fn login(&self, profile: UserProfile) {
        tracing::info!(user_id = %profile.id, "User signed in");
        self.replace(AuthState::signed_in(profile));
    }

    pub fn logout(&self) {
        tracing::info!("User signed out");
        self.replace(AuthState::default());
    }

    /// Register a callback invoked with the new state after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn replace(&self, next: AuthState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next.clone();

        // Snapshot the listeners so callbacks may subscribe or unsubscribe freely.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&next);
        }
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}
