//! Centered card shell shared by the login, sign-up and reset forms.

use leptos::prelude::*;

#[component]
pub fn AuthLayout(#[prop(into)] title: String, #[prop(into)] subtitle: String, children: Children) -> impl IntoView {
    view! {
        <div class="auth-page">
            <div class="auth-card">
                <a href="/" class="auth-card__brand">"LawnCare Pro"</a>
                <h1 class="auth-card__title">{title}</h1>
                <p class="auth-card__subtitle">{subtitle}</p>
                {children()}
            </div>
        </div>
    }
}
