//! In-memory store backed by `dashmap`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, StoreError, UserStore};
use crate::models::auth::{RefreshTokenRecord, User, UserWithPassword};
use crate::models::chirp::Chirp;

/// Process-local store. State is lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, UserWithPassword>,
    /// email → user id; the entry API makes the uniqueness check atomic.
    emails: DashMap<String, Uuid>,
    refresh_tokens: DashMap<String, RefreshTokenRecord>,
    chirps: DashMap<Uuid, Chirp>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a refresh token record, including revoked and expired ones.
    pub fn refresh_token_record(&self, token: &str) -> Option<RefreshTokenRecord> {
        self.refresh_tokens.get(token).map(|r| r.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict("email already registered".into())),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    created_at: now,
                    updated_at: now,
                    email: email.to_string(),
                    is_chirpy_red: false,
                };
                self.users.insert(
                    user.id,
                    UserWithPassword {
                        user: user.clone(),
                        hashed_password: hashed_password.to_string(),
                    },
                );
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, StoreError> {
        let Some(user_id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }

    async fn upgrade_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        match self.users.get_mut(&user_id) {
            Some(mut record) => {
                record.user.is_chirpy_red = true;
                record.user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_users(&self) -> Result<(), StoreError> {
        self.refresh_tokens.clear();
        self.chirps.clear();
        self.emails.clear();
        self.users.clear();
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn save(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.refresh_tokens.insert(
            token.to_string(),
            RefreshTokenRecord {
                user_id,
                created_at: Utc::now(),
                expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find_active(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let now = Utc::now();
        Ok(self
            .refresh_tokens
            .get(token)
            .filter(|record| record.is_active(now))
            .map(|record| record.user_id))
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        if let Some(mut record) = self.refresh_tokens.get_mut(token)
            && record.revoked_at.is_none()
        {
            record.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StoreError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, StoreError> {
        let mut chirps: Vec<Chirp> = self.chirps.iter().map(|c| c.value().clone()).collect();
        chirps.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(chirps)
    }

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, StoreError> {
        Ok(self.chirps.get(&chirp_id).map(|c| c.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user("a@example.com", "hash").await.unwrap();
        let err = store.create_user("a@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_by_email_returns_hash() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash").await.unwrap();
        let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.user, user);
        assert_eq!(found.hashed_password, "hash");
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_refresh_token_is_inactive() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        store
            .save("old", user_id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        store
            .save("fresh", user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(store.find_active("old").await.unwrap(), None);
        assert_eq!(store.find_active("fresh").await.unwrap(), Some(user_id));
    }

    #[tokio::test]
    async fn revocation_is_idempotent_and_monotonic() {
        let store = MemoryStore::new();
        store
            .save("tok", Uuid::new_v4(), Utc::now() + Duration::days(1))
            .await
            .unwrap();

        store.revoke("tok").await.unwrap();
        let first = store.refresh_token_record("tok").unwrap().revoked_at;
        assert!(first.is_some());

        store.revoke("tok").await.unwrap();
        assert_eq!(store.refresh_token_record("tok").unwrap().revoked_at, first);
        assert_eq!(store.find_active("tok").await.unwrap(), None);

        store.revoke("never-issued").await.unwrap();
    }

    #[tokio::test]
    async fn reset_cascades() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash").await.unwrap();
        store.create_chirp("hello", user.id).await.unwrap();
        store
            .save("tok", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        store.reset_users().await.unwrap();

        assert!(store.find_by_email("a@example.com").await.unwrap().is_none());
        assert!(store.list_chirps().await.unwrap().is_empty());
        assert_eq!(store.find_active("tok").await.unwrap(), None);
        store.create_user("a@example.com", "hash").await.unwrap();
    }

    #[tokio::test]
    async fn upgrade_sets_flag_for_known_users_only() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash").await.unwrap();
        assert!(store.upgrade_user(user.id).await.unwrap());
        assert!(!store.upgrade_user(Uuid::new_v4()).await.unwrap());
        let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert!(found.user.is_chirpy_red);
    }
}
