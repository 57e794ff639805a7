//! Error types for backend calls, auth flows and configuration.
//!
//! ERROR HANDLING
//! ==============
//! `Display` output of `AuthError` is what the auth forms render inline, so
//! messages are phrased for end users. Compensation outcomes ride along with
//! the primary failure instead of replacing it.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::fmt;

/// A failed call to the hosted backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Transport-level failure with no response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

/// Outcome of the best-effort sign-out run after a failed sign-up step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compensation {
    SignedOut,
    SignOutFailed(String),
}

impl Compensation {
    /// True when the orphaned credential may still hold a live session.
    #[must_use]
    pub fn needs_cleanup(&self) -> bool {
        matches!(self, Self::SignOutFailed(_))
    }
}

impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedOut => f.write_str("signed out"),
            Self::SignOutFailed(reason) => write!(f, "sign-out also failed: {reason}"),
        }
    }
}

/// Failures surfaced by auth operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Credentials rejected (bad password, duplicate email, weak password).
    #[error("{0}")]
    Credential(String),

    /// Admin sign-up attempted without the configured key.
    #[error("Invalid admin key")]
    InvalidAdminKey,

    /// The profile row could not be inserted after the credential was created.
    #[error("Failed to create user profile: {reason}")]
    ProfileCreation { reason: String, compensation: Compensation },

    /// The profile row could not be read. `compensation` is set when the
    /// failure happened inside sign-up.
    #[error("Failed to fetch user profile: {reason}")]
    ProfileFetch { reason: String, compensation: Option<Compensation> },

    /// The inserted profile never became visible within the retry budget.
    #[error("Profile not visible after {attempts} attempts")]
    ProfileNotVisible { attempts: u32, compensation: Compensation },

    #[error("Failed to update profile: {0}")]
    ProfileUpdate(String),

    #[error("Failed to sign out: {0}")]
    SignOut(String),

    #[error("Failed to send reset password email: {0}")]
    ResetRequest(String),

    /// A profile update was requested with no signed-in identity.
    #[error("No user logged in")]
    NotSignedIn,
}

impl AuthError {
    /// Compensation result attached to a failed sign-up, if any.
    #[must_use]
    pub fn compensation(&self) -> Option<&Compensation> {
        match self {
            Self::ProfileCreation { compensation, .. } | Self::ProfileNotVisible { compensation, .. } => {
                Some(compensation)
            }
            Self::ProfileFetch { compensation, .. } => compensation.as_ref(),
            _ => None,
        }
    }
}

/// Invalid client configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing config value: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
