//! Backend connection settings baked in at build time.
//!
//! The WASM bundle cannot read the host's environment, so values come from
//! `option_env!` when the crate is compiled. Parsing goes through a lookup
//! function so tests can drive it with a map.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::error::ConfigError;
use crate::util::backoff::RetryPolicy;

pub const BACKEND_URL_KEY: &str = "LAWNCARE_BACKEND_URL";
pub const ANON_KEY_KEY: &str = "LAWNCARE_BACKEND_ANON_KEY";
pub const ADMIN_SIGNUP_KEY_KEY: &str = "LAWNCARE_ADMIN_SIGNUP_KEY";
pub const RETRY_ATTEMPTS_KEY: &str = "LAWNCARE_PROFILE_RETRY_ATTEMPTS";
pub const RETRY_BASE_MS_KEY: &str = "LAWNCARE_PROFILE_RETRY_BASE_MS";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:54321";
pub const DEFAULT_ADMIN_SIGNUP_KEY: &str = "ADMIN_SECRET_KEY_2024";

/// Where the hosted backend lives and how the client talks to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL without a trailing slash.
    pub url: String,
    /// Public (anon) API key sent on every request.
    pub anon_key: String,
    /// Shared secret required to self-register as an admin.
    pub admin_signup_key: String,
    /// Profile visibility polling after sign-up.
    pub profile_retry: RetryPolicy,
}

impl BackendConfig {
    /// Config compiled into this build.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric override does not parse.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                BACKEND_URL_KEY => option_env!("LAWNCARE_BACKEND_URL"),
                ANON_KEY_KEY => option_env!("LAWNCARE_BACKEND_ANON_KEY"),
                ADMIN_SIGNUP_KEY_KEY => option_env!("LAWNCARE_ADMIN_SIGNUP_KEY"),
                RETRY_ATTEMPTS_KEY => option_env!("LAWNCARE_PROFILE_RETRY_ATTEMPTS"),
                RETRY_BASE_MS_KEY => option_env!("LAWNCARE_PROFILE_RETRY_BASE_MS"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Optional:
    /// - `LAWNCARE_BACKEND_URL`: default `http://localhost:54321`
    /// - `LAWNCARE_BACKEND_ANON_KEY`: default empty
    /// - `LAWNCARE_ADMIN_SIGNUP_KEY`: default `ADMIN_SECRET_KEY_2024`
    /// - `LAWNCARE_PROFILE_RETRY_ATTEMPTS`: default 6, must be >= 1
    /// - `LAWNCARE_PROFILE_RETRY_BASE_MS`: default 250
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for unparsable numbers, a zero attempt
    /// count, or a URL without an http(s) scheme.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let url = read(BACKEND_URL_KEY).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned());
        let url = normalize_url(&url).ok_or(ConfigError::Invalid { key: BACKEND_URL_KEY, value: url.clone() })?;
        let anon_key = read(ANON_KEY_KEY).unwrap_or_default();
        let admin_signup_key = read(ADMIN_SIGNUP_KEY_KEY).unwrap_or_else(|| DEFAULT_ADMIN_SIGNUP_KEY.to_owned());

        let mut profile_retry = RetryPolicy::default();
        if let Some(raw) = read(RETRY_ATTEMPTS_KEY) {
            profile_retry.max_attempts = raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or(ConfigError::Invalid { key: RETRY_ATTEMPTS_KEY, value: raw })?;
        }
        if let Some(raw) = read(RETRY_BASE_MS_KEY) {
            let ms = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { key: RETRY_BASE_MS_KEY, value: raw })?;
            profile_retry.base_delay = Duration::from_millis(ms);
        }

        Ok(Self { url, anon_key, admin_signup_key, profile_retry })
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_owned(),
            anon_key: String::new(),
            admin_signup_key: DEFAULT_ADMIN_SIGNUP_KEY.to_owned(),
            profile_retry: RetryPolicy::default(),
        }
    }
}

fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.split_once("://").is_some_and(|(_, rest)| !rest.is_empty());
    (has_scheme && has_host).then(|| trimmed.to_owned())
}
