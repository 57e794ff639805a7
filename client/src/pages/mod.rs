//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates shared chrome to
//! `components`.

pub mod dashboard;
pub mod landing;
pub mod login;
pub mod reset_password;
pub mod signup;
pub mod unauthorized;
