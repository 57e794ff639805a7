use super::*;
use crate::net::stub::StubBackend;
use crate::net::types::UserProfile;

fn profile(role: UserRole) -> UserProfile {
    StubBackend::with_profile("a@x.com", "pw123456", role).1
}

fn signed_in(role: UserRole) -> SessionState {
    let profile = profile(role);
    SessionState { identity: Some(profile.identity()), profile: Some(profile), loading: false }
}

// =============================================================
// decide
// =============================================================

#[test]
fn loading_is_pending_even_without_identity() {
    assert_eq!(decide(&SessionState::starting(), None, DASHBOARD_PATH), GuardDecision::Pending);
}

#[test]
fn unauthenticated_redirects_to_login_with_origin() {
    let decision = decide(&SessionState::default(), Some(&[UserRole::Admin]), DASHBOARD_PATH);
    assert_eq!(decision, GuardDecision::RedirectToLogin { from: DASHBOARD_PATH.to_owned() });
}

#[test]
fn customer_on_admin_view_is_unauthorized() {
    let decision = decide(&signed_in(UserRole::Customer), Some(&[UserRole::Admin]), "/admin");
    assert_eq!(decision, GuardDecision::Unauthorized);
}

#[test]
fn admin_on_admin_view_renders() {
    let decision = decide(&signed_in(UserRole::Admin), Some(&[UserRole::Admin]), "/admin");
    assert_eq!(decision, GuardDecision::Render);
}

#[test]
fn any_listed_role_renders() {
    let roles = [UserRole::Customer, UserRole::Landscaper];
    assert_eq!(decide(&signed_in(UserRole::Landscaper), Some(&roles), "/x"), GuardDecision::Render);
}

#[test]
fn no_role_restriction_admits_every_signed_in_user() {
    for role in UserRole::ALL {
        assert_eq!(decide(&signed_in(role), None, DASHBOARD_PATH), GuardDecision::Render);
    }
}

#[test]
fn missing_profile_with_roles_declared_renders() {
    let mut state = signed_in(UserRole::Customer);
    state.profile = None;
    assert_eq!(decide(&state, Some(&[UserRole::Admin]), "/admin"), GuardDecision::Render);
}

#[test]
fn missing_profile_without_roles_renders() {
    let mut state = signed_in(UserRole::Customer);
    state.profile = None;
    assert_eq!(decide(&state, None, DASHBOARD_PATH), GuardDecision::Render);
}

// =============================================================
// login_redirect_target
// =============================================================

#[test]
fn login_target_encodes_origin() {
    assert_eq!(login_redirect_target(DASHBOARD_PATH), "/login?from=%2Fdashboard");
}

#[test]
fn login_target_skips_empty_and_self() {
    assert_eq!(login_redirect_target(""), "/login");
    assert_eq!(login_redirect_target(LOGIN_PATH), "/login");
}
