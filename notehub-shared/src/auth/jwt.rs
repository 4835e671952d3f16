/// Bearer-token issuance and validation.
///
/// Tokens are compact JWTs signed with HS256 (HMAC-SHA256). The only claims
/// carried are the subject (a username), the issue time, and the expiry.
/// Nothing is persisted server-side: a token is valid exactly when its
/// signature checks out and its expiry has not passed.
///
/// A deliberate wrinkle in the contract: [`TokenService::verify`] does NOT
/// treat expiry as an error. It reports it, so callers can tell a stale
/// token from a forged one. Only structural or signature problems surface
/// as [`TokenError::Malformed`].
///
/// # Example
///
/// ```
/// use notehub_shared::auth::jwt::TokenService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("a-signing-secret-of-at-least-32-bytes", 3600);
///
/// let token = tokens.issue("alice")?;
/// let verified = tokens.verify(&token)?;
/// assert_eq!(verified.subject, "alice");
/// assert!(!verified.expired);
/// assert!(tokens.is_valid(&token, "alice"));
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature invalid, structure corrupt, or claims undecodable.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims carried by every issued token.
///
/// `sub` is the username; `iat`/`exp` are Unix timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username of the authenticated user
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Outcome of a successful [`TokenService::verify`] call.
///
/// `expired` is a reported fact, not a failure: the signature on an expired
/// token is still genuine, and callers such as the authentication gate need
/// to distinguish "stale" from "forged".
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    /// Username the token was issued to
    pub subject: String,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the expiry has already passed
    pub expired: bool,
}

/// Issues and validates signed bearer tokens.
///
/// Constructed once at process start from the configured signing secret and
/// token lifetime, then shared through application state. The service is a
/// pure computation over its inputs: no storage, no clock state beyond
/// reading "now".
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    lifetime: Duration,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// `lifetime_secs` is the validity window applied to every issued
    /// token. The secret should be at least 32 bytes for HS256; the length
    /// requirement is enforced at config load, not here.
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime: Duration::seconds(lifetime_secs),
        }
    }

    /// Issues a signed token for `subject`, expiring after the configured
    /// lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, &claims, &key).map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and structure, reporting (not rejecting) expiry.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] when the signature does not match
    /// the configured secret or the token cannot be parsed at all. An
    /// expired-but-genuine token is `Ok` with `expired = true`.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        // Expiry is checked by hand below so that a stale token still
        // decodes; jsonwebtoken would otherwise reject it outright.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        let claims = data.claims;
        let expired = Utc::now().timestamp() >= claims.exp;

        Ok(VerifiedToken {
            subject: claims.sub,
            issued_at: timestamp_to_datetime(claims.iat),
            expires_at: timestamp_to_datetime(claims.exp),
            expired,
        })
    }

    /// True iff the signature is valid, the subject matches
    /// `expected_subject` exactly (case-sensitive), and the token has not
    /// expired.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        match self.verify(token) {
            Ok(verified) => verified.subject == expected_subject && !verified.expired,
            Err(_) => false,
        }
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let tokens = TokenService::new(SECRET, 3600);

        let token = tokens.issue("alice").expect("should issue");
        let verified = tokens.verify(&token).expect("should verify");

        assert_eq!(verified.subject, "alice");
        assert!(!verified.expired);
        assert!(verified.expires_at > verified.issued_at);
    }

    #[test]
    fn test_expired_token_is_reported_not_rejected() {
        // Negative lifetime: the token is already stale when issued.
        let tokens = TokenService::new(SECRET, -3600);

        let token = tokens.issue("alice").expect("should issue");
        let verified = tokens.verify(&token).expect("stale token still verifies");

        assert_eq!(verified.subject, "alice");
        assert!(verified.expired);
        assert!(!tokens.is_valid(&token, "alice"));
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let tokens = TokenService::new(SECRET, 3600);
        let other = TokenService::new("a-completely-different-signing-secret!", 3600);

        let token = tokens.issue("alice").expect("should issue");
        let result = other.verify(&token);

        assert!(matches!(result, Err(TokenError::Malformed(_))));
        assert!(!other.is_valid(&token, "alice"));
    }

    #[test]
    fn test_garbage_input_is_malformed() {
        let tokens = TokenService::new(SECRET, 3600);

        assert!(matches!(
            tokens.verify("not-a-jwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(tokens.verify(""), Err(TokenError::Malformed(_))));
        assert!(matches!(
            tokens.verify("aaaa.bbbb.cccc"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_is_valid_subject_match_is_exact() {
        let tokens = TokenService::new(SECRET, 3600);
        let token = tokens.issue("alice").expect("should issue");

        assert!(tokens.is_valid(&token, "alice"));
        assert!(!tokens.is_valid(&token, "Alice"));
        assert!(!tokens.is_valid(&token, "bob"));
        assert!(!tokens.is_valid(&token, ""));
    }
}
