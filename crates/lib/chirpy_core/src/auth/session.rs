//! Session service: registration, login, token refresh and revocation.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use http::HeaderMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::AuthError;
use super::bearer::bearer_token;
use super::jwt::{ACCESS_TOKEN_EXPIRY_SECS, issue_access_token, verify_access_token};
use super::password::{hash_password, verify_password};
use super::refresh::{REFRESH_TOKEN_EXPIRY_DAYS, generate_refresh_token};
use crate::models::auth::{Session, User};
use crate::store::{RefreshTokenStore, StoreError, UserStore};

/// Immutable auth settings, built once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing secret for access tokens.
    pub jwt_secret: String,
    /// Access token lifetime when the caller does not request one.
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Config with the default lifetimes (1 hour access, 60 days refresh).
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl: Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        }
    }

    fn secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// Orchestrates credentials and tokens over the user and refresh-token stores.
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    config: Arc<AuthConfig>,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Access token lifetime for a login request.
    ///
    /// Missing, zero or negative requests get the configured default. Requests
    /// are capped at the refresh token lifetime.
    pub fn access_token_lifetime(&self, requested_secs: Option<i64>) -> Duration {
        let cap = self.config.refresh_token_ttl;
        match requested_secs {
            Some(secs) if secs > 0 => Duration::try_seconds(secs).map_or(cap, |d| d.min(cap)),
            _ => self.config.access_token_ttl,
        }
    }

    /// Create an account with a bcrypt-hashed password.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".into()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }

        let hashed = hash_password(password)?;
        let user = self
            .users
            .create_user(email, &hashed)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate with email + password and issue an access/refresh pair.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_lifetime_secs: Option<i64>,
    ) -> Result<Session, AuthError> {
        let record = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &record.hashed_password).map_err(|e| match e {
            AuthError::PasswordMismatch => AuthError::InvalidCredentials,
            other => other,
        })?;

        let user = record.user;
        let lifetime = self.access_token_lifetime(requested_lifetime_secs);
        let access_token = issue_access_token(user.id, self.config.secret(), lifetime)?;
        let refresh_token = generate_refresh_token()?;

        let expires_at = Utc::now() + self.config.refresh_token_ttl;
        self.refresh_tokens
            .save(&refresh_token, user.id, expires_at)
            .await?;

        info!(user_id = %user.id, "user logged in");
        Ok(Session {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a fresh access token (default lifetime).
    ///
    /// Unknown, expired and revoked tokens all fail the same way. The refresh
    /// token itself is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = self
            .refresh_tokens
            .find_active(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        debug!(%user_id, "refreshing access token");
        issue_access_token(user_id, self.config.secret(), self.config.access_token_ttl)
    }

    /// Revoke a refresh token. Unknown or already revoked tokens are fine.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(refresh_token).await?;
        Ok(())
    }

    /// Resolve the user behind the bearer access token in `headers`.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = bearer_token(headers)?;
        verify_access_token(token, self.config.secret())
    }
}
