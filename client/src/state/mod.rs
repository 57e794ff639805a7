//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! A single `session` model holds who is signed in; route guards and pages
//! read it from context.

pub mod session;
