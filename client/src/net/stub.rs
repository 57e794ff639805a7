//! In-memory backend for exercising auth flows without a network.
//!
//! Records every call by name so tests can assert what reached the backend,
//! and exposes switches to inject failures and read-after-write lag.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::backend::{AuthBackend, AuthListener, AuthListeners, ProfileStore, Subscription};
use super::types::{AuthChange, AuthEvent, AuthSession, Identity, NewProfile, ProfileChanges, UserProfile};
use crate::error::BackendError;

pub(crate) const STUB_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

#[derive(Default)]
pub(crate) struct StubBackend {
    calls: RefCell<Vec<&'static str>>,
    accounts: RefCell<HashMap<String, (Identity, String)>>,
    rows: RefCell<HashMap<String, UserProfile>>,
    session: RefCell<Option<AuthSession>>,
    resets: RefCell<Vec<(String, String)>>,
    listeners: AuthListeners,
    next_id: Cell<u32>,
    pub(crate) fail_insert: Cell<bool>,
    pub(crate) fail_select: Cell<bool>,
    pub(crate) fail_update: Cell<bool>,
    pub(crate) fail_sign_out: Cell<bool>,
    pub(crate) fail_reset: Cell<bool>,
    pub(crate) omit_signup_identity: Cell<bool>,
    /// Number of upcoming `select_profile` calls that report no row.
    pub(crate) hidden_reads: Cell<u32>,
}

impl StubBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Backend with a registered credential and no profile row.
    pub(crate) fn with_account(email: &str, password: &str) -> (Self, Identity) {
        let stub = Self::new();
        let identity = stub.register(email, password);
        (stub, identity)
    }

    /// Backend with a registered credential and its profile row.
    pub(crate) fn with_profile(email: &str, password: &str, role: super::types::UserRole) -> (Self, UserProfile) {
        let (stub, identity) = Self::with_account(email, password);
        let profile = stub.store_row(&NewProfile::for_identity(&identity, role));
        (stub, profile)
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub(crate) fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    pub(crate) fn row(&self, user_id: &str) -> Option<UserProfile> {
        self.rows.borrow().get(user_id).cloned()
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    pub(crate) fn session(&self) -> Option<AuthSession> {
        self.session.borrow().clone()
    }

    pub(crate) fn resets(&self) -> Vec<(String, String)> {
        self.resets.borrow().clone()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Install a session directly, as if restored from storage.
    pub(crate) fn restore_session(&self, identity: &Identity) {
        *self.session.borrow_mut() = Some(session_for(identity));
    }

    /// Deliver a notification to subscribers.
    pub(crate) fn emit(&self, change: &AuthChange) {
        self.listeners.emit(change);
    }

    fn register(&self, email: &str, password: &str) -> Identity {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let identity = Identity { id: format!("user-{n}"), email: email.to_owned() };
        self.accounts
            .borrow_mut()
            .insert(email.to_owned(), (identity.clone(), password.to_owned()));
        identity
    }

    fn store_row(&self, row: &NewProfile) -> UserProfile {
        let profile = UserProfile {
            user_id: row.user_id.clone(),
            email: row.email.clone(),
            phone_number: row.phone_number.clone(),
            user_role: row.user_role,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            profile_image_url: row.profile_image_url.clone(),
            street_address: row.street_address.clone(),
            city: row.city.clone(),
            state: row.state.clone(),
            zip_code: row.zip_code.clone(),
            account_status: row.account_status,
            created_at: STUB_TIMESTAMP.to_owned(),
            updated_at: STUB_TIMESTAMP.to_owned(),
            deleted_at: None,
        };
        self.rows.borrow_mut().insert(row.user_id.clone(), profile.clone());
        profile
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }

    fn open_session(&self, identity: &Identity) {
        let session = session_for(identity);
        *self.session.borrow_mut() = Some(session.clone());
        self.listeners.emit(&AuthChange { event: AuthEvent::SignedIn, session: Some(session) });
    }
}

fn session_for(identity: &Identity) -> AuthSession {
    AuthSession {
        access_token: format!("access-{}", identity.id),
        refresh_token: format!("refresh-{}", identity.id),
        expires_at: i64::MAX,
        user: identity.clone(),
    }
}

#[async_trait::async_trait(?Send)]
impl AuthBackend for StubBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Identity>, BackendError> {
        self.record("sign_up");
        if self.accounts.borrow().contains_key(email) {
            return Err(BackendError::new(Some(422), "User already registered"));
        }
        if password.len() < 6 {
            return Err(BackendError::new(Some(422), "Password should be at least 6 characters"));
        }
        let identity = self.register(email, password);
        if self.omit_signup_identity.get() {
            return Ok(None);
        }
        self.open_session(&identity);
        Ok(Some(identity))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        self.record("sign_in");
        let found = self.accounts.borrow().get(email).cloned();
        match found {
            Some((identity, stored)) if stored == password => {
                self.open_session(&identity);
                Ok(identity)
            }
            _ => Err(BackendError::new(Some(400), "Invalid login credentials")),
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.record("sign_out");
        if self.fail_sign_out.get() {
            return Err(BackendError::transport("network unreachable"));
        }
        *self.session.borrow_mut() = None;
        self.listeners.emit(&AuthChange { event: AuthEvent::SignedOut, session: None });
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        self.record("current_session");
        Ok(self.session.borrow().clone())
    }

    async fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        self.record("request_password_reset");
        if self.fail_reset.get() {
            return Err(BackendError::new(Some(429), "Email rate limit exceeded"));
        }
        self.resets.borrow_mut().push((email.to_owned(), redirect_to.to_owned()));
        Ok(())
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

#[async_trait::async_trait(?Send)]
impl ProfileStore for StubBackend {
    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), BackendError> {
        self.record("insert_profile");
        if self.fail_insert.get() || self.rows.borrow().contains_key(&profile.user_id) {
            return Err(BackendError::new(Some(409), "duplicate key value violates unique constraint"));
        }
        self.store_row(profile);
        Ok(())
    }

    async fn select_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        self.record("select_profile");
        if self.fail_select.get() {
            return Err(BackendError::new(Some(500), "internal error"));
        }
        let hidden = self.hidden_reads.get();
        if hidden > 0 {
            self.hidden_reads.set(hidden - 1);
            return Ok(None);
        }
        Ok(self.row(user_id))
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<(), BackendError> {
        self.record("update_profile");
        if self.fail_update.get() {
            return Err(BackendError::new(Some(403), "permission denied"));
        }
        if let Some(row) = self.rows.borrow_mut().get_mut(user_id) {
            row.apply(changes);
        }
        Ok(())
    }
}
