/// Token codec: signed, time-limited identity assertions
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256). A token carries the
/// subject's user id and expires 7 days after issuance. The server keeps
/// no token state; a token becomes invalid only by expiring or by the
/// client discarding it.
///
/// # Security
///
/// - **Algorithm**: HS256, secret must be at least 32 bytes
/// - **Expiration**: 7 days, enforced at verification
/// - **Uniform invalidity**: [`verify`] returns `None` for malformed,
///   tampered and expired tokens alike, so no caller can tell which
///   check failed
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::token::{issue, verify};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let user_id = Uuid::new_v4();
///
/// let token = issue(user_id, secret)?;
/// assert_eq!(verify(&token, secret), Some(user_id));
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime: 7 days from issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Error type for token issuance
///
/// Verification has no error type on purpose: it reports `Option<Uuid>`.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign the token
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in an identity assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the default 7-day expiration
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiry(user_id, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Creates claims with a custom time-to-live
    ///
    /// A negative duration produces an already-expired assertion, which
    /// is useful for testing the expiration property.
    pub fn with_expiry(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks whether the claims have passed their expiration instant
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs a set of claims into a token string
pub fn sign(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| TokenError::Signing(e.to_string()))
}

/// Issues a signed identity assertion for a user, valid for 7 days
pub fn issue(user_id: Uuid, secret: &str) -> Result<String, TokenError> {
    sign(&Claims::new(user_id), secret)
}

/// Verifies a token and extracts the subject's user id
///
/// Checks the signature and the expiration instant. Returns the subject
/// id only if both pass; any failure collapses to `None`. Callers must
/// not be able to distinguish a tampered token from an expired one, so
/// the decode error is logged at debug level and discarded.
pub fn verify(token: &str, secret: &str) -> Option<Uuid> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Some(data.claims.sub),
        Err(e) => {
            tracing::debug!("Token verification failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_verify_roundtrip() {
        let user_id = Uuid::new_v4();

        let token = issue(user_id, SECRET).expect("Should issue token");
        assert_eq!(verify(&token, SECRET), Some(user_id));
    }

    #[test]
    fn test_claims_default_expiry_is_seven_days() {
        let claims = Claims::new(Uuid::new_v4());

        let ttl = claims.exp - claims.iat;
        assert_eq!(ttl, Duration::days(7).num_seconds());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let user_id = Uuid::new_v4();
        let claims = Claims::with_expiry(user_id, Duration::hours(-1));
        assert!(claims.is_expired());

        let token = sign(&claims, SECRET).expect("Should sign token");
        assert_eq!(verify(&token, SECRET), None);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue(Uuid::new_v4(), SECRET).expect("Should issue token");

        assert_eq!(verify(&token, "another-secret-key-of-sufficient-len"), None);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(verify("not-a-token", SECRET), None);
        assert_eq!(verify("", SECRET), None);
        assert_eq!(verify("a.b.c", SECRET), None);
    }

    #[test]
    fn test_invalid_outcomes_are_indistinguishable() {
        // Expired, tampered and malformed tokens must all collapse to the
        // same `None`, never to distinct values or panics.
        let user_id = Uuid::new_v4();

        let expired = sign(&Claims::with_expiry(user_id, Duration::hours(-1)), SECRET).unwrap();
        let valid = issue(user_id, SECRET).unwrap();
        let mut tampered = valid.clone();
        tampered.push('x');

        assert_eq!(verify(&expired, SECRET), verify(&tampered, SECRET));
        assert_eq!(verify(&tampered, SECRET), verify("garbage", SECRET));
    }

    #[test]
    fn test_two_tokens_for_same_user_both_verify() {
        // A login after registration yields a second token; both must
        // resolve to the same subject until they expire.
        let user_id = Uuid::new_v4();

        let t1 = issue(user_id, SECRET).unwrap();
        let t2 = issue(user_id, SECRET).unwrap();

        assert_eq!(verify(&t1, SECRET), Some(user_id));
        assert_eq!(verify(&t2, SECRET), Some(user_id));
    }
}
