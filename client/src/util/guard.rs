//! Access decision for role-restricted routes.
//!
//! DESIGN
//! ======
//! `decide` is pure so the rules are tested without a router; the
//! `ProtectedRoute` component only turns the decision into navigation.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::net::types::UserRole;
use crate::state::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What a guarded route should do with the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a placeholder.
    Pending,
    /// Not signed in. `from` is the path that was requested.
    RedirectToLogin { from: String },
    /// Signed in, but the role is not allowed here.
    Unauthorized,
    Render,
}

/// Decide access for `requested` given the session and the allowed roles.
///
/// `None` for `allowed` admits any signed-in user. Roles are only checked
/// against a loaded profile; a signed-in session without one renders.
pub fn decide(state: &SessionState, allowed: Option<&[UserRole]>, requested: &str) -> GuardDecision {
    if state.loading {
        return GuardDecision::Pending;
    }
    if state.identity.is_none() {
        return GuardDecision::RedirectToLogin { from: requested.to_owned() };
    }
    match (allowed, &state.profile) {
        (Some(allowed), Some(profile)) if !allowed.contains(&profile.user_role) => GuardDecision::Unauthorized,
        _ => GuardDecision::Render,
    }
}

/// Login URL that remembers where the user was headed.
pub fn login_redirect_target(from: &str) -> String {
    if from.is_empty() || from == LOGIN_PATH {
        return LOGIN_PATH.to_owned();
    }
    format!("{LOGIN_PATH}?from={}", urlencoding::encode(from))
}
