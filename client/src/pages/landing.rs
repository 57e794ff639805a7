//! Public landing page.

#[cfg(test)]
#[path = "landing_test.rs"]
mod landing_test;

use leptos::prelude::*;
use leptos_router::components::A;

/// Title and blurb for each feature card.
const FEATURES: [(&str, &str); 3] = [
    ("Easy Scheduling", "Book your service in minutes with our simple scheduling system."),
    ("Licensed Professionals", "All our landscapers are vetted and professionally trained."),
    ("Real-Time Updates", "Stay informed with live updates on your service status."),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing">
            <header class="landing__header">
                <span class="landing__brand">"LawnCare Pro"</span>
                <nav class="landing__nav">
                    <A href="/login">"Login"</A>
                    <A href="/signup">"Book Now"</A>
                </nav>
            </header>
            <main>
                <section class="landing__hero">
                    <h1>
                        "Professional Lawn Care"
                        <span class="landing__hero-accent">"Made Simple"</span>
                    </h1>
                    <p>"Book expert lawn care services in minutes. Get your perfect lawn without the hassle."</p>
                    <A href="/signup">"Schedule Service"</A>
                </section>
                <section class="landing__features">
                    {FEATURES
                        .into_iter()
                        .map(|(title, blurb)| view! {
                            <div class="landing__feature">
                                <h3>{title}</h3>
                                <p>{blurb}</p>
                            </div>
                        })
                        .collect_view()}
                </section>
            </main>
        </div>
    }
}
