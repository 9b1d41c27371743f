//! Password hashing via bcrypt.

use tracing::debug;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// Fails with [`AuthError::PasswordMismatch`] when the password is wrong and
/// [`AuthError::MalformedHash`] when `hash` is not a bcrypt string.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    match bcrypt::verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::PasswordMismatch),
        // verify only fails while parsing the stored hash or its cost
        Err(e) => {
            debug!("bcrypt verify: {e}");
            Err(AuthError::MalformedHash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_self_describing() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$2b$10$"), "unexpected hash: {hash}");
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn verify_accepts_matching_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn verify_rejects_other_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        let err = verify_password("Correct horse battery staple", &hash).unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a).is_ok());
        assert!(verify_password("same", &b).is_ok());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let err = verify_password("anything", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AuthError::MalformedHash), "got {err:?}");
    }
}
