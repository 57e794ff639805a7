//! Shown when a signed-in user's role is not allowed on a route.

use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-card__title">"Unauthorized"</h1>
                <p class="auth-card__subtitle">"You don't have permission to view this page."</p>
                <A href="/dashboard">"Back to dashboard"</A>
            </div>
        </div>
    }
}
