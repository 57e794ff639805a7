//! Seams between auth flows and the hosted backend.
//!
//! ARCHITECTURE
//! ============
//! `AuthBackend` covers credential calls and session notifications,
//! `ProfileStore` covers the `users` table. `SupabaseClient` implements both
//! over HTTP; tests substitute an in-memory stub.
//!
//! Futures are `?Send`: browser fetches are bound to the single JS thread.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use super::types::{AuthChange, AuthSession, Identity, NewProfile, ProfileChanges, UserProfile};
use crate::error::BackendError;

/// Credential operations of the external auth service.
#[async_trait::async_trait(?Send)]
pub trait AuthBackend {
    /// Register a credential. `Ok(None)` when the service accepted the call
    /// but returned no identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Identity>, BackendError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// The persisted session, refreshed if it is about to expire.
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError>;

    async fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), BackendError>;

    /// Register for session-change notifications until the returned
    /// subscription is released.
    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription;
}

/// Row operations on the `users` table.
#[async_trait::async_trait(?Send)]
pub trait ProfileStore {
    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), BackendError>;

    /// `Ok(None)` when no row exists for `user_id`.
    async fn select_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError>;

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<(), BackendError>;
}

/// Callback invoked for every session change.
pub type AuthListener = Arc<dyn Fn(&AuthChange) + Send + Sync>;

type ListenerSlots = Mutex<Vec<(u64, AuthListener)>>;

/// Listener registry shared by backend implementations.
#[derive(Clone, Default)]
pub struct AuthListeners {
    inner: Arc<ListenerState>,
}

#[derive(Default)]
struct ListenerState {
    next_id: AtomicU64,
    slots: ListenerSlots,
}

impl AuthListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `listener`; it stays registered until the subscription is released.
    #[must_use]
    pub fn subscribe(&self, listener: AuthListener) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots().push((id, listener));
        Subscription { id, registry: Arc::downgrade(&self.inner) }
    }

    /// Deliver `change` to every registered listener, in registration order.
    pub fn emit(&self, change: &AuthChange) {
        // Snapshot so listeners may subscribe/unsubscribe while being called.
        let listeners: Vec<AuthListener> = self.slots().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(change);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, Vec<(u64, AuthListener)>> {
        self.inner.slots.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Handle for a registered listener.
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerState>,
}

impl Subscription {
    /// Stop delivery to this listener. Safe to call after the backend is gone.
    pub fn unsubscribe(self) {
        if let Some(state) = self.registry.upgrade() {
            let mut slots = state.slots.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            slots.retain(|(id, _)| *id != self.id);
        }
    }
}
