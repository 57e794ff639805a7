//! Auth operations: credential calls sequenced with profile-store calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages reach these through the session controller, which folds results
//! into the shared session cell. Nothing here touches UI state.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures surface unrecovered, except during sign-up: once a
//! credential exists, any later failure signs it out again and reports the
//! outcome of that sign-out next to the primary error.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::config::BackendConfig;
use crate::error::{AuthError, BackendError, Compensation};
use crate::net::backend::{AuthBackend, ProfileStore};
use crate::net::types::{Identity, NewProfile, ProfileChanges, UserProfile, UserRole};
use crate::util::backoff::{self, RetryPolicy};

/// Path the password-reset email links back to.
pub const RESET_PASSWORD_PATH: &str = "/reset-password";

/// Input collected by the sign-up form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
    /// Only consulted when `role` is admin.
    pub admin_key: String,
}

/// Credential and profile operations over one backend.
#[derive(Clone)]
pub struct AuthService<B> {
    backend: B,
    retry: RetryPolicy,
    admin_signup_key: String,
}

impl<B> AuthService<B>
where
    B: AuthBackend + ProfileStore,
{
    pub fn new(backend: B, config: &BackendConfig) -> Self {
        Self { backend, retry: config.profile_retry, admin_signup_key: config.admin_signup_key.clone() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create a credential and its profile row, then wait for the row to be
    /// readable.
    ///
    /// # Errors
    ///
    /// - `InvalidAdminKey` before any backend call when an admin sign-up
    ///   carries the wrong key.
    /// - `Credential` when the auth service rejects the request or returns no
    ///   identity.
    /// - `ProfileCreation`, `ProfileFetch` or `ProfileNotVisible` after the
    ///   credential exists; each carries the compensating sign-out outcome.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<UserProfile, AuthError> {
        if request.role == UserRole::Admin && request.admin_key != self.admin_signup_key {
            log::warn!("admin sign-up rejected: bad admin key");
            return Err(AuthError::InvalidAdminKey);
        }

        let identity = self
            .backend
            .sign_up(&request.email, &request.password)
            .await
            .map_err(|e| AuthError::Credential(e.message))?
            .ok_or_else(|| AuthError::Credential("No user returned from signup".to_owned()))?;
        log::info!("credential created for {}", identity.id);

        let row = NewProfile::for_identity(&identity, request.role);
        if let Err(e) = self.backend.insert_profile(&row).await {
            log::warn!("profile insert failed for {}: {e}", identity.id);
            let compensation = self.compensate().await;
            return Err(AuthError::ProfileCreation { reason: e.message, compensation });
        }

        match self.await_profile(&identity).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => {
                log::warn!(
                    "profile for {} not visible after {:?} of polling",
                    identity.id,
                    self.retry.total_wait()
                );
                let compensation = self.compensate().await;
                Err(AuthError::ProfileNotVisible { attempts: self.retry.attempts(), compensation })
            }
            Err(e) => {
                let compensation = self.compensate().await;
                Err(AuthError::ProfileFetch { reason: e.message, compensation: Some(compensation) })
            }
        }
    }

    /// Authenticate and load the caller's profile.
    ///
    /// # Errors
    ///
    /// `Credential` on rejected credentials, `ProfileFetch` when the profile
    /// row is missing or unreadable.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let identity = self
            .backend
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| AuthError::Credential(e.message))?;
        log::info!("signed in as {}", identity.id);
        self.get_profile(&identity).await
    }

    /// # Errors
    ///
    /// `SignOut` when the backend rejects the call.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.backend.sign_out().await.map_err(|e| AuthError::SignOut(e.message))
    }

    /// Request a reset email linking back to `origin` + `/reset-password`.
    ///
    /// # Errors
    ///
    /// `ResetRequest` when the backend refuses.
    pub async fn reset_password(&self, email: &str, origin: &str) -> Result<(), AuthError> {
        let redirect_to = reset_redirect_target(origin);
        self.backend
            .request_password_reset(email, &redirect_to)
            .await
            .map_err(|e| AuthError::ResetRequest(e.message))
    }

    /// Apply a partial update. The caller merges accepted fields into any
    /// cached copy; nothing is re-fetched here. Empty changes make no call.
    ///
    /// # Errors
    ///
    /// `ProfileUpdate` when the backend rejects the write.
    pub async fn update_profile(&self, identity: &Identity, changes: &ProfileChanges) -> Result<(), AuthError> {
        if changes.is_empty() {
            return Ok(());
        }
        self.backend
            .update_profile(&identity.id, changes)
            .await
            .map_err(|e| AuthError::ProfileUpdate(e.message))
    }

    /// # Errors
    ///
    /// `ProfileFetch` when no row exists or the read fails.
    pub async fn get_profile(&self, identity: &Identity) -> Result<UserProfile, AuthError> {
        match self.backend.select_profile(&identity.id).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => Err(AuthError::ProfileFetch { reason: "No profile found for user".to_owned(), compensation: None }),
            Err(e) => Err(AuthError::ProfileFetch { reason: e.message, compensation: None }),
        }
    }

    /// Poll for the profile row with backoff. `Ok(None)` once the attempt
    /// budget is spent without seeing it.
    async fn await_profile(&self, identity: &Identity) -> Result<Option<UserProfile>, BackendError> {
        for attempt in 1..=self.retry.attempts() {
            backoff::sleep(self.retry.delay_before(attempt)).await;
            if let Some(profile) = self.backend.select_profile(&identity.id).await? {
                return Ok(Some(profile));
            }
            log::debug!("profile for {} not visible yet (attempt {attempt})", identity.id);
        }
        Ok(None)
    }

    async fn compensate(&self) -> Compensation {
        match self.backend.sign_out().await {
            Ok(()) => Compensation::SignedOut,
            Err(e) => {
                log::error!("compensating sign-out failed: {e}");
                Compensation::SignOutFailed(e.message)
            }
        }
    }
}

/// Absolute URL the reset email should send the user back to.
#[must_use]
pub fn reset_redirect_target(origin: &str) -> String {
    format!("{}{RESET_PASSWORD_PATH}", origin.trim_end_matches('/'))
}
