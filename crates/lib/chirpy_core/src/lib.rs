//! # chirpy_core
//!
//! Core domain logic for Chirpy: credentials, access and refresh tokens,
//! sessions, chirp validation, and the persistence collaborators they use.

pub mod auth;
pub mod chirps;
pub mod migrate;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
