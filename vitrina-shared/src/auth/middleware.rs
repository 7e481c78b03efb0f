/// Per-request authorization gate
///
/// Resolves a presented token into a [`Principal`]. The token only proves
/// who the caller was at issuance; the account is re-resolved on every
/// request so deactivation takes effect immediately, session TTL
/// notwithstanding.
///
/// Every failure collapses to [`AuthError::Unauthorized`]: a missing token,
/// a bad signature, an expired session and a deactivated account are
/// indistinguishable to the caller.

use std::sync::Arc;

use serde::Serialize;

use crate::models::AccountDirectory;

use super::error::AuthError;
use super::token::TokenCodec;

/// Authenticated caller identity attached to gated requests
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub account_id: i64,
    pub email: String,
    pub role_id: i64,
    pub role: String,
}

impl Principal {
    /// Role check hook for route-level enforcement, case-insensitive
    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }
}

/// Verifies a token and re-resolves the account behind it
///
/// `token` is the raw credential as extracted from the cookie or the
/// `Authorization` header by the HTTP layer; `None` means no credential was
/// presented at all.
pub async fn authorize(
    accounts: &Arc<dyn AccountDirectory>,
    codec: &TokenCodec,
    token: Option<&str>,
) -> Result<Principal, AuthError> {
    let token = token.ok_or(AuthError::Unauthorized)?;

    let claims = codec
        .verify(token)
        .map_err(|_| AuthError::Unauthorized)?;

    let found = accounts
        .find_by_id(claims.sub)
        .await
        .map_err(|_| AuthError::Unauthorized)?
        .ok_or(AuthError::Unauthorized)?;

    if !found.account.status {
        return Err(AuthError::Unauthorized);
    }

    Ok(Principal {
        account_id: found.account.id,
        email: found.account.email,
        role_id: found.account.role_id,
        role: found.role_name,
    })
}
