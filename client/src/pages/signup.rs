//! Sign-up page: credential, role choice and the admin key gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin key field only appears for the admin role. The key itself is
//! checked by `AuthService::sign_up` before any backend call, so the form
//! only collects it.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::auth_layout::AuthLayout;
use crate::error::AuthError;
use crate::net::types::UserRole;
use crate::services::auth::SignUpRequest;
use crate::state::session::AppSession;

/// Option label for each role in the role select.
fn role_option_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Customer => "Customer looking for lawn care",
        UserRole::Landscaper => "Landscaper offering services",
        UserRole::Admin => "Administrator",
    }
}

fn admin_key_input_type(visible: bool) -> &'static str {
    if visible { "text" } else { "password" }
}

/// Build the request from raw form values. The admin key is dropped for
/// non-admin roles.
fn build_signup_request(
    email: &str,
    password: &str,
    role: UserRole,
    admin_key: &str,
) -> Result<SignUpRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    let admin_key = if role == UserRole::Admin { admin_key.to_owned() } else { String::new() };
    Ok(SignUpRequest { email: email.to_owned(), password: password.to_owned(), role, admin_key })
}

/// Inline error text. When the orphaned account could not be signed out
/// again, say so next to the primary failure.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn signup_error_message(err: &AuthError) -> String {
    match err.compensation() {
        Some(compensation) if compensation.needs_cleanup() => {
            format!("{err}. The new account may still be signed in ({compensation}).")
        }
        _ => err.to_string(),
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(UserRole::default());
    let admin_key = RwSignal::new(String::new());
    let show_admin_key = RwSignal::new(false);
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match build_signup_request(&email.get(), &password.get(), role.get(), &admin_key.get()) {
            Ok(request) => request,
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
                match session.sign_up(&request).await {
                    Ok(_) => navigate(
                        crate::util::guard::DASHBOARD_PATH,
                        leptos_router::NavigateOptions { replace: true, ..Default::default() },
                    ),
                    Err(e) => {
                        log::error!("sign-up failed: {e}");
                        error.set(signup_error_message(&e));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, &navigate, request);
    };

    view! {
        <AuthLayout title="Create an account" subtitle="Start managing your lawn care services">
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
                    autocomplete="new-password"
                    required
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <label class="auth-form__label" for="role">"I am a..."</label>
                <select
                    id="role"
                    class="auth-form__input"
                    on:change=move |ev| {
                        if let Some(next) = UserRole::parse(&event_target_value(&ev)) {
                            role.set(next);
                        }
                    }
                >
                    {UserRole::ALL
                        .into_iter()
                        .map(|option| {
                            view! {
                                <option value=option.as_str() selected=move || role.get() == option>
                                    {role_option_label(option)}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <Show when=move || role.get() == UserRole::Admin>
                    <label class="auth-form__label" for="admin-key">"Admin Key"</label>
                    <div class="auth-form__secret">
                        <input
                            id="admin-key"
                            class="auth-form__input"
                            type=move || admin_key_input_type(show_admin_key.get())
                            prop:value=move || admin_key.get()
                            on:input=move |ev| admin_key.set(event_target_value(&ev))
                        />
                        <button
                            class="auth-form__toggle"
                            type="button"
                            on:click=move |_| show_admin_key.update(|v| *v = !*v)
                        >
                            {move || if show_admin_key.get() { "Hide" } else { "Show" }}
                        </button>
                    </div>
                </Show>
                <div class="auth-form__links">
                    <A href="/login">"Already have an account? Sign in"</A>
                </div>
                <button class="auth-form__submit" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Creating account..." } else { "Create account" }}
                </button>
            </form>
        </AuthLayout>
    }
}
