//! Role-specific dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `ProtectedRoute`, so an identity is present. A session
//! without a loaded profile renders nothing; the panels depend on the role.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::{UserProfile, UserRole};
use crate::state::session::{AppSession, SessionState};

/// Content of one dashboard card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanelBody {
    /// Placeholder sentence for an empty list.
    Empty(&'static str),
    /// Labelled figures.
    Stats(&'static [(&'static str, &'static str)]),
    /// Status line with an indicator dot.
    Status(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Panel {
    title: &'static str,
    body: PanelBody,
    action: Option<&'static str>,
}

const CUSTOMER_PANELS: [Panel; 3] = [
    Panel {
        title: "Upcoming Services",
        body: PanelBody::Empty("No upcoming services scheduled"),
        action: Some("Book a Service"),
    },
    Panel { title: "Service History", body: PanelBody::Empty("No previous services"), action: None },
    Panel { title: "Notifications", body: PanelBody::Empty("No new notifications"), action: None },
];

const LANDSCAPER_PANELS: [Panel; 3] = [
    Panel {
        title: "Today's Schedule",
        body: PanelBody::Empty("No appointments scheduled for today"),
        action: None,
    },
    Panel { title: "Service Requests", body: PanelBody::Empty("No pending requests"), action: None },
    Panel { title: "Revenue Overview", body: PanelBody::Empty("No revenue data available"), action: None },
];

const ADMIN_PANELS: [Panel; 3] = [
    Panel {
        title: "User Statistics",
        body: PanelBody::Stats(&[("Total Users", "0"), ("New Users (Last 7 Days)", "0")]),
        action: None,
    },
    Panel { title: "Service Overview", body: PanelBody::Empty("No services data available"), action: None },
    Panel { title: "System Status", body: PanelBody::Status("All systems operational"), action: None },
];

fn dashboard_panels(role: UserRole) -> &'static [Panel; 3] {
    match role {
        UserRole::Customer => &CUSTOMER_PANELS,
        UserRole::Landscaper => &LANDSCAPER_PANELS,
        UserRole::Admin => &ADMIN_PANELS,
    }
}

/// Role name as shown on the user card, e.g. `Landscaper`.
fn role_display_name(role: UserRole) -> String {
    let name = role.as_str();
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| first.to_ascii_uppercase().to_string() + chars.as_str())
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = expect_context::<RwSignal<SessionState>>();
    let session = expect_context::<AppSession>();
    let navigate = use_navigate();
    let error = RwSignal::new(String::new());

    let on_sign_out = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match session.sign_out().await {
                    Ok(()) => navigate(crate::util::guard::LOGIN_PATH, leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        log::error!("sign-out failed: {e}");
                        error.set(e.to_string());
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, &navigate);
    };

    move || {
        state.get().profile.map(|profile| {
            view! {
                <div class="dashboard">
                    <nav class="dashboard__nav">
                        <span class="dashboard__brand">"LawnCare Pro"</span>
                        <button class="dashboard__sign-out" on:click=on_sign_out.clone()>
                            "Sign out"
                        </button>
                    </nav>
                    <Show when=move || !error.get().is_empty()>
                        <div class="dashboard__error">{move || error.get()}</div>
                    </Show>
                    <main class="dashboard__main">
                        <UserCard profile=profile.clone()/>
                        <div class="dashboard__panels">
                            {dashboard_panels(profile.user_role)
                                .iter()
                                .map(|panel| view! { <DashboardPanel panel=*panel/> })
                                .collect_view()}
                        </div>
                    </main>
                </div>
            }
        })
    }
}

#[component]
fn UserCard(profile: UserProfile) -> impl IntoView {
    view! {
        <section class="user-card">
            <div class="user-card__avatar"></div>
            <div>
                <h2 class="user-card__email">{profile.email}</h2>
                <p class="user-card__role">{role_display_name(profile.user_role)}</p>
            </div>
        </section>
    }
}

#[component]
fn DashboardPanel(panel: Panel) -> impl IntoView {
    let body = match panel.body {
        PanelBody::Empty(text) => view! { <p class="panel__empty">{text}</p> }.into_any(),
        PanelBody::Stats(rows) => view! {
            <dl class="panel__stats">
                {rows
                    .iter()
                    .map(|(label, value)| view! {
                        <dt>{*label}</dt>
                        <dd>{*value}</dd>
                    })
                    .collect_view()}
            </dl>
        }
        .into_any(),
        PanelBody::Status(text) => view! {
            <p class="panel__status">
                <span class="panel__status-dot"></span>
                {text}
            </p>
        }
        .into_any(),
    };

    view! {
        <section class="panel">
            <h3 class="panel__title">{panel.title}</h3>
            {body}
            {panel.action.map(|label| view! { <button class="panel__action" type="button">{label}</button> })}
        </section>
    }
}
