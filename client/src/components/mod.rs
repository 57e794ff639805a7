//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared session from Leptos context; pages compose
//! them per route.

pub mod auth_layout;
pub mod protected_route;
