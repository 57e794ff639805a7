//! Password reset request page.

#[cfg(test)]
#[path = "reset_password_test.rs"]
mod reset_password_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::auth_layout::AuthLayout;
use crate::state::session::AppSession;

const RESET_SENT_MESSAGE: &str = "Check your email for password reset instructions";
/// Shown for every backend failure; the backend's own reason is only logged.
const RESET_FAILED_MESSAGE: &str = "Failed to send reset password email";

fn validate_reset_input(email: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Enter an email first.");
    }
    Ok(email.to_owned())
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let email = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let sent = RwSignal::new(false);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = match validate_reset_input(&email.get()) {
            Ok(email) => email,
            Err(msg) => {
                error.set(msg.to_owned());
                return;
            }
        };
        error.set(String::new());
        sent.set(false);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                let origin = crate::util::location::origin();
                match session.reset_password(&email_value, &origin).await {
                    Ok(()) => sent.set(true),
                    Err(e) => {
                        log::warn!("password reset request failed: {e}");
                        error.set(RESET_FAILED_MESSAGE.to_owned());
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, email_value);
    };

    view! {
        <AuthLayout title="Reset your password" subtitle="We'll send you instructions to reset your password">
            <Show
                when=move || sent.get()
                fallback=move || {
                    view! {
                        <form class="auth-form" on:submit=on_submit.clone()>
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
                            <div class="auth-form__links">
                                <A href="/login">"Back to login"</A>
                            </div>
                            <button class="auth-form__submit" type="submit" disabled=move || busy.get()>
                                {move || if busy.get() { "Sending..." } else { "Send reset instructions" }}
                            </button>
                        </form>
                    }
                }
            >
                <div class="auth-form__success">
                    <p>{RESET_SENT_MESSAGE}</p>
                    <A href="/login">"Return to login"</A>
                </div>
            </Show>
        </AuthLayout>
    }
}
