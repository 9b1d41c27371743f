//! Persistence collaborators.
//!
//! The auth and chirp logic only talks to these traits. [`memory::MemoryStore`]
//! backs tests and database-less runs; [`postgres::PgStore`] is the production
//! implementation.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{User, UserWithPassword};
use crate::models::chirp::Chirp;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// User records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, StoreError>;

    /// Set the upgraded flag. Returns `false` if the user does not exist.
    async fn upgrade_user(&self, user_id: Uuid) -> Result<bool, StoreError>;

    /// Delete every user along with their chirps and refresh tokens.
    async fn reset_users(&self) -> Result<(), StoreError>;
}

/// Refresh token records, keyed by the token string.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn save(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Owner of `token` if it exists, is unexpired and is not revoked.
    async fn find_active(&self, token: &str) -> Result<Option<Uuid>, StoreError>;

    /// Mark `token` revoked. Unknown or already revoked tokens are left alone.
    async fn revoke(&self, token: &str) -> Result<(), StoreError>;
}

/// Chirp records.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StoreError>;

    /// All chirps, oldest first.
    async fn list_chirps(&self) -> Result<Vec<Chirp>, StoreError>;

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, StoreError>;
}

/// Everything the API needs from persistence.
pub trait Store: UserStore + RefreshTokenStore + ChirpStore {}

impl<T: UserStore + RefreshTokenStore + ChirpStore> Store for T {}
