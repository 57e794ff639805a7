//! Networking modules for the hosted auth + table backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `backend` defines the seams the services depend on, `supabase` is the live
//! HTTP client behind them, and `types` defines the shared wire schema.

pub mod backend;
#[cfg(test)]
pub(crate) mod stub;
pub mod supabase;
pub mod types;
