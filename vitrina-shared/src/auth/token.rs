/// Signed-token issuance and verification
///
/// Tokens are signed with HS256 using a process-wide secret and carry an
/// absolute expiry. They are stateless: validity is a pure function of
/// signature and clock, there is no persistence and no revocation list.
///
/// # Token flavors
///
/// - **Session token**: default long-lived window (configurable TTL),
///   carries the account id, email and role id
/// - **Reset token**: fixed 5-minute window, carries only account id and
///   email under the same secret, with a shorter life and no role claim
///
/// Verification fails uniformly with [`TokenError::Invalid`] for a bad
/// signature, a malformed or wrongly-shaped payload, and expiry. Callers
/// must not be able to distinguish these.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use vitrina_shared::auth::token::TokenCodec;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let codec = TokenCodec::new("secret-key-at-least-32-bytes-long!!", Duration::hours(24));
///
/// let token = codec.issue_session(7, "a@b.com", 2)?;
/// let claims = codec.verify(&token)?;
/// assert_eq!(claims.sub, 7);
/// assert_eq!(claims.email, "a@b.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of a password-reset token
pub const RESET_TOKEN_TTL_SECS: i64 = 5 * 60;

/// Error type for token operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, malformed payload or expired; deliberately
    /// indistinguishable
    #[error("invalid or expired token")]
    Invalid,

    /// Signing failed at issuance
    #[error("failed to issue token: {0}")]
    Issue(String),
}

/// Claims embedded in a signed token
///
/// The reset flavor omits `role`; any token whose decoded shape does not
/// match this structure is rejected at verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: i64,

    /// Account email at issuance time
    pub email: String,

    /// Role id; absent on reset tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<i64>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Stateless codec issuing and verifying signed claim tokens
///
/// Constructed once at process start; the secret and session TTL are
/// immutable afterwards. Two calls with the same inputs and clock value are
/// equivalent.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: String,
    session_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            session_ttl,
        }
    }

    /// Issues a session token carrying identity and role claims
    pub fn issue_session(
        &self,
        account_id: i64,
        email: &str,
        role_id: i64,
    ) -> Result<String, TokenError> {
        self.issue(account_id, email, Some(role_id), self.session_ttl)
    }

    /// Issues a password-reset token; 5-minute window, no role claim
    pub fn issue_reset(&self, account_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue(
            account_id,
            email,
            None,
            Duration::seconds(RESET_TOKEN_TTL_SECS),
        )
    }

    pub(crate) fn issue(
        &self,
        account_id: i64,
        email: &str,
        role_id: Option<i64>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            email: email.to_string(),
            role: role_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, &claims, &key).map_err(|e| TokenError::Issue(e.to_string()))
    }

    /// Verifies signature and expiry, returning the decoded claims
    ///
    /// Zero leeway: a token is invalid the second its window closes.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
