//! Route wrapper that only renders its children for permitted sessions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps guarded routes in `app.rs`. The access rules live in
//! `util::guard::decide`; this component re-evaluates them whenever the
//! session or location changes and navigates with `replace` so the guarded
//! URL does not stay in history.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::net::types::UserRole;
use crate::state::session::SessionState;
use crate::util::guard::{self, GuardDecision};

#[component]
pub fn ProtectedRoute(
    /// Roles permitted on this route; `None` admits any signed-in user.
    #[prop(optional)]
    allowed_roles: Option<Vec<UserRole>>,
    children: ChildrenFn,
) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let location = use_location();
    let navigate = use_navigate();
    let roles = StoredValue::new(allowed_roles);

    let decision = Memo::new(move |_| {
        let path = location.pathname.get();
        let state = session.get();
        roles.with_value(|roles| guard::decide(&state, roles.as_deref(), &path))
    });

    Effect::new(move || {
        let replace = NavigateOptions { replace: true, ..NavigateOptions::default() };
        match decision.get() {
            GuardDecision::RedirectToLogin { from } => navigate(&guard::login_redirect_target(&from), replace),
            GuardDecision::Unauthorized => navigate(guard::UNAUTHORIZED_PATH, replace),
            GuardDecision::Pending | GuardDecision::Render => {}
        }
    });

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Render
            fallback=move || {
                (decision.get() == GuardDecision::Pending)
                    .then(|| view! { <div class="route-loading">"Loading..."</div> })
            }
        >
            {children()}
        </Show>
    }
}
