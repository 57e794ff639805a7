//! Login page: email + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded routes send unauthenticated visitors here with `?from=<path>`.
//! The value is kept in the URL only; a successful sign-in always lands on
//! the dashboard.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::auth_layout::AuthLayout;
use crate::state::session::AppSession;

/// Trim both fields and require each to be present.
fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(input) => input,
            Err(msg) => {
                error.set(msg.to_owned());
                return;
            }
        };
        error.set(String::new());
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match session.sign_in(&email_value, &password_value).await {
                    Ok(_) => navigate(crate::util::guard::DASHBOARD_PATH, leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        log::warn!("sign-in failed: {e}");
                        error.set(e.to_string());
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, &navigate, email_value, password_value);
    };

    view! {
        <AuthLayout title="Welcome back" subtitle="Sign in to your account">
            <form class="auth-form" on:submit=on_submit>
                <Show when=move || !error.get().is_empty()>
                    <div class="auth-form__error">{move || error.get()}</div>
                </Show>
                <label class="auth-form__label" for="email">"Email address"</label>
                <input
                    id="email"
                    class="auth-form__input"
                    type="email"
                    autocomplete="email"
                    required
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <label class="auth-form__label" for="password">"Password"</label>
                <input
                    id="password"
                    class="auth-form__input"
                    type="password"
                    autocomplete="current-password"
                    required
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <div class="auth-form__links">
                    <A href="/reset-password">"Forgot your password?"</A>
                    <A href="/signup">"Need an account? Sign up"</A>
                </div>
                <button class="auth-form__submit" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </AuthLayout>
    }
}
