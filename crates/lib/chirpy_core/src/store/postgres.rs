//! PostgreSQL store.
//!
//! Refresh tokens are persisted as SHA-256 digests; the plaintext token only
//! ever exists in the client's hands and in transit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, StoreError, UserStore};
use crate::models::auth::{User, UserWithPassword};
use crate::models::chirp::Chirp;

type UserRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, bool);
type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

/// Store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// SHA-256 hash a refresh token for storage.
fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn user_from_row((id, created_at, updated_at, email, is_chirpy_red): UserRow) -> User {
    User {
        id,
        created_at,
        updated_at,
        email,
        is_chirpy_red,
    }
}

fn chirp_from_row((id, created_at, updated_at, body, user_id): ChirpRow) -> Chirp {
    Chirp {
        id,
        created_at,
        updated_at,
        body,
        user_id,
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) \
             RETURNING id, created_at, updated_at, email, is_chirpy_red",
        )
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict("email already registered".into())
            }
            _ => StoreError::from(e),
        })?;
        Ok(user_from_row(row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>, String, bool, String)>(
            "SELECT id, created_at, updated_at, email, is_chirpy_red, hashed_password \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, created_at, updated_at, email, is_chirpy_red, hashed_password)| {
                UserWithPassword {
                    user: user_from_row((id, created_at, updated_at, email, is_chirpy_red)),
                    hashed_password,
                }
            },
        ))
    }

    async fn upgrade_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reset_users(&self) -> Result<(), StoreError> {
        // chirps and refresh_tokens cascade
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn save(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(hash_refresh_token(token))
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_active(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM refresh_tokens \
             WHERE token_hash = $1 \
               AND revoked_at IS NULL \
               AND expires_at > now()",
        )
        .bind(hash_refresh_token(token))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user_id)
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = now(), updated_at = now() \
             WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(hash_refresh_token(token))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StoreError> {
        let row = sqlx::query_as::<_, ChirpRow>(
            "INSERT INTO chirps (body, user_id) VALUES ($1, $2) \
             RETURNING id, created_at, updated_at, body, user_id",
        )
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(chirp_from_row(row))
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, StoreError> {
        let rows = sqlx::query_as::<_, ChirpRow>(
            "SELECT id, created_at, updated_at, body, user_id FROM chirps \
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(chirp_from_row).collect())
    }

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, StoreError> {
        let row = sqlx::query_as::<_, ChirpRow>(
            "SELECT id, created_at, updated_at, body, user_id FROM chirps WHERE id = $1",
        )
        .bind(chirp_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(chirp_from_row))
    }
}
