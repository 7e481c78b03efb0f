/// Error taxonomy for the identity core
///
/// Every validation step surfaces a distinct kind; the HTTP boundary maps
/// kinds to status codes. Tests assert on kinds, never on message text.
/// There is no automatic retry anywhere in this core: every failure is
/// terminal for its request.

use crate::models::{DuplicateField, StoreError};

use super::password::PasswordError;
use super::token::TokenError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No account matches the given email
    #[error("account does not exist")]
    AccountNotFound,

    /// The account is soft-deleted/blocked (`status = false`)
    #[error("account is inactive or blocked")]
    AccountInactive,

    /// Password comparison failed at login
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The supplied current password does not match the stored hash
    #[error("current password does not match")]
    CurrentPasswordMismatch,

    /// Token failed verification; signature, shape and expiry failures are
    /// deliberately indistinguishable to callers
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// An account with this dni or email already exists
    #[error("an account with this {0} already exists")]
    DuplicateAccount(DuplicateField),

    /// No role matches the given id or name
    #[error("role does not exist")]
    RoleNotFound,

    /// The reset mail could not be dispatched; the token was still issued
    /// and expires naturally
    #[error("failed to dispatch mail")]
    MailDispatchFailed,

    /// Authorization-gate catch-all
    #[error("not authorized")]
    Unauthorized,

    /// Opaque passthrough from the backing store or hasher
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => AuthError::DuplicateAccount(field),
            StoreError::Database(err) => AuthError::Persistence(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::InvalidOrExpiredToken,
            // Signer failure at issuance is an authorization failure for the
            // caller, matching the boundary behavior this service replaces.
            TokenError::Issue(_) => AuthError::Unauthorized,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Persistence(err.to_string())
    }
}
