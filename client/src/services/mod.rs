//! Domain services used by the session controller and pages.
//!
//! ARCHITECTURE
//! ============
//! Service modules own backend sequencing so components stay focused on
//! rendering and input handling.

pub mod auth;
