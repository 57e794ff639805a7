//! Session state for the current browser tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and pages read `SessionState` from a `RwSignal` context.
//! Every write goes through `SessionController`, which re-derives the whole
//! state on each auth event instead of patching individual fields.
//!
//! TRADE-OFFS
//! ==========
//! Full re-derivation avoids half-updated states, at the cost of a visible
//! loading flash when several notifications arrive back to back.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

use crate::error::AuthError;
use crate::net::backend::{AuthBackend, AuthListener, ProfileStore};
use crate::net::types::{AuthChange, Identity, ProfileChanges, UserProfile};
use crate::services::auth::{AuthService, SignUpRequest};

/// Identity, profile and loading flag for the current tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub profile: Option<UserProfile>,
    pub loading: bool,
}

/// Coarse lifecycle stage derived from a `SessionState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    LoadingProfile,
    Authenticated,
    /// Credentialed, but the profile could not be loaded.
    AuthenticatedWithoutProfile,
}

impl SessionState {
    /// State at app start, before the stored session has been checked.
    #[must_use]
    pub fn starting() -> Self {
        Self { identity: None, profile: None, loading: true }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (self.loading, &self.identity, &self.profile) {
            (true, _, _) => SessionPhase::LoadingProfile,
            (false, None, _) => SessionPhase::Unauthenticated,
            (false, Some(_), Some(_)) => SessionPhase::Authenticated,
            (false, Some(_), None) => SessionPhase::AuthenticatedWithoutProfile,
        }
    }
}

/// Storage for the session state. The app uses `RwSignal<SessionState>`.
pub trait SessionCell {
    fn snapshot(&self) -> SessionState;
    fn replace(&self, next: SessionState);

    fn modify(&self, f: impl FnOnce(&mut SessionState)) {
        let mut state = self.snapshot();
        f(&mut state);
        self.replace(state);
    }
}

impl SessionCell for RwSignal<SessionState> {
    fn snapshot(&self) -> SessionState {
        self.get_untracked()
    }

    fn replace(&self, next: SessionState) {
        self.set(next);
    }
}

/// Runs auth operations and folds their results into a session cell.
#[derive(Clone)]
pub struct SessionController<B, C> {
    auth: AuthService<B>,
    cell: C,
}

impl<B, C> SessionController<B, C>
where
    B: AuthBackend + ProfileStore,
    C: SessionCell,
{
    pub fn new(auth: AuthService<B>, cell: C) -> Self {
        Self { auth, cell }
    }

    pub fn auth(&self) -> &AuthService<B> {
        &self.auth
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    /// Restore any persisted session and load its profile.
    pub async fn initialize(&self) {
        self.cell.modify(|s| s.loading = true);
        let identity = match self.auth.backend().current_session().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                log::error!("session restore failed: {e}");
                None
            }
        };
        self.settle(identity).await;
    }

    /// Re-derive state from a session-change notification.
    pub async fn handle_auth_change(&self, change: &AuthChange) {
        log::debug!("auth change: {:?}", change.event);
        let identity = change.session.as_ref().map(|s| s.user.clone());
        self.settle(identity).await;
    }

    /// # Errors
    ///
    /// Propagates the `AuthService::sign_up` error after updating state.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<UserProfile, AuthError> {
        self.cell.modify(|s| s.loading = true);
        let result = self.auth.sign_up(request).await;
        self.finish_credential_call(&result).await;
        result
    }

    /// # Errors
    ///
    /// Propagates the `AuthService::sign_in` error after updating state. A
    /// missing profile leaves the session credentialed with no profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        self.cell.modify(|s| s.loading = true);
        let result = self.auth.sign_in(email, password).await;
        self.finish_credential_call(&result).await;
        result
    }

    /// # Errors
    ///
    /// `SignOut` when the backend refuses; the session is left as it was.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.cell.modify(|s| s.loading = true);
        let result = self.auth.sign_out().await;
        self.cell.modify(|s| {
            if result.is_ok() {
                s.identity = None;
                s.profile = None;
            }
            s.loading = false;
        });
        result
    }

    /// # Errors
    ///
    /// `ResetRequest` when the backend refuses.
    pub async fn reset_password(&self, email: &str, origin: &str) -> Result<(), AuthError> {
        self.auth.reset_password(email, origin).await
    }

    /// Update the signed-in user's profile and merge the accepted fields
    /// into the cached copy.
    ///
    /// # Errors
    ///
    /// `NotSignedIn` without an identity, `ProfileUpdate` when the write fails.
    pub async fn update_profile(&self, changes: &ProfileChanges) -> Result<(), AuthError> {
        let identity = self.cell.snapshot().identity.ok_or(AuthError::NotSignedIn)?;
        self.auth.update_profile(&identity, changes).await?;
        self.cell.modify(|s| {
            if let Some(profile) = s.profile.as_mut() {
                profile.apply(changes);
            }
        });
        Ok(())
    }

    /// Set `identity`, then fetch-or-clear the profile. Fetch failures are
    /// logged and leave the profile empty.
    ///
    /// Other writers may land while the fetch is in flight. A state for a
    /// different identity wins outright, and a failed fetch never clears a
    /// profile already loaded for the same user.
    async fn settle(&self, identity: Option<Identity>) {
        self.cell.replace(SessionState { identity: identity.clone(), profile: None, loading: true });
        let profile = match &identity {
            Some(identity) => match self.auth.get_profile(identity).await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    log::error!("profile load failed for {}: {e}", identity.id);
                    None
                }
            },
            None => None,
        };
        let current = self.cell.snapshot();
        if current.identity != identity {
            log::debug!("session changed during profile load; keeping newer state");
            return;
        }
        let already_loaded = current
            .profile
            .as_ref()
            .is_some_and(|p| identity.as_ref().is_some_and(|i| p.identity().id == i.id));
        self.cell.modify(|s| {
            if profile.is_some() || !already_loaded {
                s.profile = profile;
            }
            s.loading = false;
        });
    }

    async fn finish_credential_call(&self, result: &Result<UserProfile, AuthError>) {
        let identity = match self.auth.backend().current_session().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                log::warn!("session lookup after auth call failed: {e}");
                None
            }
        };
        let profile = result.as_ref().ok().cloned();
        let identity = identity.or_else(|| profile.as_ref().map(UserProfile::identity));
        self.cell.replace(SessionState { identity, profile, loading: false });
    }
}

/// Session controller wired to the live backend and the app's signal.
pub type AppSession = SessionController<crate::net::supabase::SupabaseClient, RwSignal<SessionState>>;

/// Restore the session on mount and follow auth notifications until the
/// owning view is cleaned up.
pub fn install_session(session: AppSession) {
    #[cfg(feature = "hydrate")]
    {
        let init = session.clone();
        leptos::task::spawn_local(async move { init.initialize().await });
    }

    let handler = session.clone();
    let listener: AuthListener = std::sync::Arc::new(move |change: &AuthChange| {
        let handler = handler.clone();
        let change = change.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move { handler.handle_auth_change(&change).await });
        #[cfg(not(feature = "hydrate"))]
        let _ = (handler, change);
    });
    let subscription = session.auth().backend().on_auth_state_change(listener);
    on_cleanup(move || subscription.unsubscribe());
}
