//! Service layer between handlers and `chirpy_core`.

pub mod auth;
pub mod chirps;
pub mod users;
