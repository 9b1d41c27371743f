//! JWT access token generation and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Value of the `iss` claim on every token we mint.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Default access token lifetime: 1 hour.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Generate a signed JWT access token (HS256) for `user_id`.
pub fn issue_access_token(
    user_id: Uuid,
    secret: &[u8],
    lifetime: Duration,
) -> Result<String, AuthError> {
    issue_access_token_at(user_id, secret, lifetime, Utc::now())
}

/// Same as [`issue_access_token`] with an explicit issue instant.
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &[u8],
    lifetime: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let expires_at = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AuthError::Validation("Token lifetime is out of range".into()))?;
    let claims = TokenClaims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify a JWT access token, returning the user ID it was issued to.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
    verify_access_token_at(token, secret, Utc::now())
}

/// Same as [`verify_access_token`] with an explicit verification instant.
///
/// The token is rejected once `now` is past `exp`; no leeway is applied.
pub fn verify_access_token_at(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against `now` instead of the library clock.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map_err(classify)?
        .claims;

    if now.timestamp() > claims.exp {
        return Err(AuthError::TokenExpired);
    }

    Uuid::parse_str(&claims.sub)
        .map_err(|e| AuthError::MalformedToken(format!("subject is not a user id: {e}")))
}

fn classify(e: jsonwebtoken::errors::Error) -> AuthError {
    debug!("jwt decode: {e}");
    match e.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn one_hour() -> Duration {
        Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS)
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, Duration::minutes(5)).unwrap();
        assert_eq!(verify_access_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn token_has_three_segments_and_expected_claims() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = issue_access_token_at(user_id, SECRET, one_hour(), now).unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);

        let claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
        assert_eq!(claims["iss"], "chirpy");
        assert_eq!(claims["sub"], user_id.to_string());
        assert_eq!(claims["iat"], now.timestamp());
        assert_eq!(claims["exp"], now.timestamp() + ACCESS_TOKEN_EXPIRY_SECS);
    }

    #[test]
    fn unrepresentable_expiry_is_rejected() {
        let err = issue_access_token_at(Uuid::new_v4(), SECRET, Duration::MAX, Utc::now())
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn wrong_secret_is_signature_error() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, one_hour()).unwrap();
        let err = verify_access_token(&token, b"other-secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature), "got {err:?}");
    }

    #[test]
    fn expired_token_is_rejected_even_with_correct_secret() {
        let issued = Utc::now() - Duration::hours(2);
        let token = issue_access_token_at(Uuid::new_v4(), SECRET, one_hour(), issued).unwrap();
        let err = verify_access_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired), "got {err:?}");
    }

    #[test]
    fn token_is_valid_up_to_the_expiry_instant() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = issue_access_token_at(user_id, SECRET, Duration::seconds(30), now).unwrap();

        let at_expiry = now + Duration::seconds(30);
        assert_eq!(verify_access_token_at(&token, SECRET, at_expiry).unwrap(), user_id);

        let past_expiry = at_expiry + Duration::seconds(1);
        let err = verify_access_token_at(&token, SECRET, past_expiry).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired), "got {err:?}");
    }

    #[test]
    fn tampered_claims_break_the_signature() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, one_hour()).unwrap();
        let segments: Vec<&str> = token.split('.').collect();

        let mut claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
        claims["sub"] = serde_json::Value::String(Uuid::new_v4().to_string());
        let forged_claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", segments[0], forged_claims, segments[2]);

        let err = verify_access_token(&forged, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature), "got {err:?}");
    }

    #[test]
    fn garbage_is_malformed() {
        for token in ["", "abc", "a.b.c", "not a jwt at all"] {
            let err = verify_access_token(token, SECRET).unwrap_err();
            assert!(matches!(err, AuthError::MalformedToken(_)), "{token:?}: {err:?}");
        }
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "iss": "chirpy",
                "sub": Uuid::new_v4().to_string(),
                "iat": Utc::now().timestamp(),
                "exp": Utc::now().timestamp() + 3600,
            })
            .to_string(),
        );
        let err = verify_access_token(&format!("{header}.{claims}."), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)), "got {err:?}");
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims {
            iss: TOKEN_ISSUER.into(),
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        let err = verify_access_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)), "got {err:?}");
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims {
            iss: "someone-else".into(),
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        let err = verify_access_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)), "got {err:?}");
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims {
            iss: TOKEN_ISSUER.into(),
            sub: "user-42".into(),
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        let err = verify_access_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)), "got {err:?}");
    }
}
