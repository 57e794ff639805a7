//! Current page origin and wall-clock time from the browser.

/// `window.location.origin`, or empty outside the browser.
pub fn origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

/// Seconds since the Unix epoch, or 0 outside the browser.
pub fn now_secs() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let secs = (js_sys::Date::now() / 1000.0) as i64;
        secs
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}
