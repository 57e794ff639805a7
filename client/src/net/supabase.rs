//! HTTP client for the hosted backend (GoTrue auth + PostgREST tables).
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, session persisted
//! in `localStorage`.
//! Server-side (SSR): calls fail with a transport error and there is never a
//! stored session, so server renders always start logged out.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `BackendError` carrying the status and the most
//! specific message the body offers.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::sync::Arc;

use super::backend::{AuthBackend, AuthListener, AuthListeners, ProfileStore, Subscription};
use super::types::{AuthSession, Identity, NewProfile, ProfileChanges, UserProfile};
#[cfg(feature = "hydrate")]
use super::types::{AuthChange, AuthEvent};
use crate::config::BackendConfig;
use crate::error::BackendError;
#[cfg(any(test, feature = "hydrate"))]
use serde::Deserialize;

/// `localStorage` key holding the serialized `AuthSession`.
pub const SESSION_STORAGE_KEY: &str = "lawncare.auth.session";

/// Sessions closer than this to expiry are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 10;

/// Token lifetime assumed when a response carries neither `expires_at` nor
/// `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[cfg(not(feature = "hydrate"))]
const NOT_AVAILABLE: &str = "not available on server";

/// Backend client shared through Leptos context.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: BackendConfig,
    listeners: AuthListeners,
}

impl SupabaseClient {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self { inner: Arc::new(ClientInner { config, listeners: AuthListeners::new() }) }
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }
}

// =============================================================================
// WIRE HELPERS
// =============================================================================

#[cfg(any(test, feature = "hydrate"))]
fn signup_url(base: &str) -> String {
    format!("{base}/auth/v1/signup")
}

#[cfg(any(test, feature = "hydrate"))]
fn password_grant_url(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=password")
}

#[cfg(any(test, feature = "hydrate"))]
fn refresh_grant_url(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=refresh_token")
}

#[cfg(any(test, feature = "hydrate"))]
fn logout_url(base: &str) -> String {
    format!("{base}/auth/v1/logout")
}

#[cfg(any(test, feature = "hydrate"))]
fn recover_url(base: &str, redirect_to: &str) -> String {
    if redirect_to.is_empty() {
        return format!("{base}/auth/v1/recover");
    }
    format!("{base}/auth/v1/recover?redirect_to={}", urlencoding::encode(redirect_to))
}

#[cfg(any(test, feature = "hydrate"))]
fn users_url(base: &str) -> String {
    format!("{base}/rest/v1/users")
}

#[cfg(any(test, feature = "hydrate"))]
fn user_row_url(base: &str, user_id: &str) -> String {
    format!("{base}/rest/v1/users?user_id=eq.{}", urlencoding::encode(user_id))
}

#[cfg(any(test, feature = "hydrate"))]
fn user_select_url(base: &str, user_id: &str) -> String {
    format!("{}&select=*", user_row_url(base, user_id))
}

/// Token for the `Authorization` header: the session's, else the anon key.
#[cfg(any(test, feature = "hydrate"))]
fn bearer_token<'a>(anon_key: &'a str, session: Option<&'a AuthSession>) -> &'a str {
    session.map_or(anon_key, |s| s.access_token.as_str())
}

/// Pick the most specific message from an error body.
#[cfg(any(test, feature = "hydrate"))]
fn error_message(status: u16, body: &serde_json::Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(serde_json::Value::as_str))
        .map_or_else(|| format!("request failed: {status}"), str::to_owned)
}

#[cfg(any(test, feature = "hydrate"))]
fn needs_refresh(session: &AuthSession, now: i64) -> bool {
    session.expires_at.saturating_sub(now) <= REFRESH_MARGIN_SECS
}

#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[cfg(any(test, feature = "hydrate"))]
impl UserDto {
    fn into_identity(self) -> Identity {
        Identity { id: self.id, email: self.email.unwrap_or_default() }
    }
}

#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserDto,
}

#[cfg(any(test, feature = "hydrate"))]
impl TokenResponse {
    fn into_session(self, now: i64) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self
                .expires_at
                .unwrap_or_else(|| now + self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)),
            user: self.user.into_identity(),
        }
    }
}

#[cfg(any(test, feature = "hydrate"))]
/// `/signup` answers with a session when confirmation is off, otherwise
/// with the bare (or wrapped) user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    Wrapped { user: UserDto },
    User(UserDto),
}

#[cfg(any(test, feature = "hydrate"))]
impl SignUpResponse {
    fn into_parts(self, now: i64) -> (Identity, Option<AuthSession>) {
        match self {
            Self::Session(token) => {
                let session = token.into_session(now);
                (session.user.clone(), Some(session))
            }
            Self::Wrapped { user } | Self::User(user) => (user.into_identity(), None),
        }
    }
}

// =============================================================================
// HTTP (hydrate only)
// =============================================================================

#[cfg(feature = "hydrate")]
impl SupabaseClient {
    fn base(&self) -> &str {
        &self.inner.config.url
    }

    fn stored_session() -> Option<AuthSession> {
        crate::util::storage::load_json(SESSION_STORAGE_KEY)
    }

    fn store_session(&self, session: &AuthSession, event: AuthEvent) {
        crate::util::storage::save_json(SESSION_STORAGE_KEY, session);
        self.inner.listeners.emit(&AuthChange { event, session: Some(session.clone()) });
    }

    fn drop_session(&self) {
        crate::util::storage::remove(SESSION_STORAGE_KEY);
        self.inner.listeners.emit(&AuthChange { event: AuthEvent::SignedOut, session: None });
    }

    fn authorize(&self, builder: gloo_net::http::RequestBuilder, session: Option<&AuthSession>) -> gloo_net::http::RequestBuilder {
        let anon = self.inner.config.anon_key.as_str();
        builder
            .header("apikey", anon)
            .header("Authorization", &format!("Bearer {}", bearer_token(anon, session)))
    }

    async fn execute(
        builder: gloo_net::http::RequestBuilder,
        body: Option<&serde_json::Value>,
    ) -> Result<gloo_net::http::Response, BackendError> {
        let sent = match body {
            Some(body) => builder.json(body).map_err(transport)?.send().await,
            None => builder.send().await,
        };
        let resp = sent.map_err(transport)?;
        if resp.ok() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.json::<serde_json::Value>().await.unwrap_or(serde_json::Value::Null);
        Err(BackendError::new(Some(status), error_message(status, &body)))
    }

    async fn refresh(&self, session: &AuthSession) -> Result<AuthSession, BackendError> {
        let builder = self.authorize(gloo_net::http::Request::post(&refresh_grant_url(self.base())), None);
        let payload = serde_json::json!({ "refresh_token": session.refresh_token });
        let resp = Self::execute(builder, Some(&payload)).await?;
        let token: TokenResponse = resp.json().await.map_err(transport)?;
        Ok(token.into_session(crate::util::location::now_secs()))
    }
}

#[cfg(feature = "hydrate")]
fn transport(e: gloo_net::Error) -> BackendError {
    BackendError::transport(e.to_string())
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

#[async_trait::async_trait(?Send)]
impl AuthBackend for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Identity>, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = self.authorize(gloo_net::http::Request::post(&signup_url(self.base())), None);
            let payload = serde_json::json!({ "email": email, "password": password });
            let resp = Self::execute(builder, Some(&payload)).await?;
            let parsed: SignUpResponse = resp.json().await.map_err(transport)?;
            let (identity, session) = parsed.into_parts(crate::util::location::now_secs());
            if let Some(session) = session {
                self.store_session(&session, AuthEvent::SignedIn);
            }
            Ok(Some(identity))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = self.authorize(gloo_net::http::Request::post(&password_grant_url(self.base())), None);
            let payload = serde_json::json!({ "email": email, "password": password });
            let resp = Self::execute(builder, Some(&payload)).await?;
            let token: TokenResponse = resp.json().await.map_err(transport)?;
            let session = token.into_session(crate::util::location::now_secs());
            self.store_session(&session, AuthEvent::SignedIn);
            Ok(session.user)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            if let Some(session) = Self::stored_session() {
                let builder = self.authorize(gloo_net::http::Request::post(&logout_url(self.base())), Some(&session));
                Self::execute(builder, None).await?;
            }
            self.drop_session();
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let Some(session) = Self::stored_session() else {
                return Ok(None);
            };
            if !needs_refresh(&session, crate::util::location::now_secs()) {
                return Ok(Some(session));
            }
            match self.refresh(&session).await {
                Ok(fresh) => {
                    self.store_session(&fresh, AuthEvent::TokenRefreshed);
                    Ok(Some(fresh))
                }
                Err(e) => {
                    log::warn!("session refresh failed, signing out locally: {e}");
                    self.drop_session();
                    Ok(None)
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(None)
        }
    }

    async fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let url = recover_url(self.base(), redirect_to);
            let builder = self.authorize(gloo_net::http::Request::post(&url), None);
            let payload = serde_json::json!({ "email": email });
            Self::execute(builder, Some(&payload)).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, redirect_to);
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }
}

#[async_trait::async_trait(?Send)]
impl ProfileStore for SupabaseClient {
    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let session = Self::stored_session();
            let builder = self
                .authorize(gloo_net::http::Request::post(&users_url(self.base())), session.as_ref())
                .header("Prefer", "return=minimal");
            let payload = serde_json::json!([profile]);
            Self::execute(builder, Some(&payload)).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = profile;
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }

    async fn select_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let session = Self::stored_session();
            let url = user_select_url(self.base(), user_id);
            let builder = self.authorize(gloo_net::http::Request::get(&url), session.as_ref());
            let resp = Self::execute(builder, None).await?;
            let rows: Vec<UserProfile> = resp.json().await.map_err(transport)?;
            Ok(rows.into_iter().next())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = user_id;
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let session = Self::stored_session();
            let url = user_row_url(self.base(), user_id);
            let builder = self
                .authorize(gloo_net::http::Request::patch(&url), session.as_ref())
                .header("Prefer", "return=minimal");
            let payload = serde_json::to_value(changes).map_err(|e| BackendError::transport(e.to_string()))?;
            Self::execute(builder, Some(&payload)).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (user_id, changes);
            Err(BackendError::transport(NOT_AVAILABLE))
        }
    }
}
