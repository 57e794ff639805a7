//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::protected_route::ProtectedRoute;
use crate::config::BackendConfig;
use crate::net::supabase::SupabaseClient;
use crate::pages::{
    dashboard::DashboardPage, landing::LandingPage, login::LoginPage, reset_password::ResetPasswordPage,
    signup::SignupPage, unauthorized::UnauthorizedPage,
};
use crate::services::auth::AuthService;
use crate::state::session::{AppSession, SessionController, SessionState, install_session};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Backend config baked into this build, or the defaults when an override
/// is malformed.
fn load_backend_config() -> BackendConfig {
    BackendConfig::from_build_env().unwrap_or_else(|e| {
        log::error!("backend config rejected, using defaults: {e}");
        BackendConfig::default()
    })
}

/// Root application component.
///
/// Provides the session signal and controller, starts session restore, and
/// sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let client = SupabaseClient::new(load_backend_config());
    let auth = AuthService::new(client.clone(), client.config());
    let state = RwSignal::new(SessionState::starting());
    let session: AppSession = SessionController::new(auth, state);

    provide_context(state);
    provide_context(session.clone());
    install_session(session);

    view! {
        <Stylesheet id="leptos" href="/pkg/lawncare.css"/>
        <Title text="LawnCare Pro"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LandingPage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("signup") view=SignupPage/>
                <Route path=StaticSegment("reset-password") view=ResetPasswordPage/>
                <Route
                    path=StaticSegment("dashboard")
                    view=|| view! { <ProtectedRoute><DashboardPage/></ProtectedRoute> }
                />
                <Route path=StaticSegment("unauthorized") view=UnauthorizedPage/>
            </Routes>
        </Router>
    }
}
