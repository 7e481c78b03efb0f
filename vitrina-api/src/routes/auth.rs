/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Validate credentials, get a session token
/// - `POST /auth/forget-password` - Mail a reset link
/// - `POST /auth/reset-password` - Set a new password via reset token
/// - `POST /auth/change-password` - Rotate the password of the caller (gated)
/// - `GET  /auth/me` - Identity of the caller (gated)

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vitrina_shared::auth::error::AuthError;
use vitrina_shared::auth::gateway::Session;
use vitrina_shared::auth::middleware::Principal;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Forget-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgetPasswordRequest {
    /// Email address of the account to reset
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset-password request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Reset token from the mailed link
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    /// Replacement password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Change-password request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password, re-verified even with a valid session
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    /// Replacement password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Plain acknowledgement body for flows without payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Login-specific status mapping
///
/// Login is the one endpoint where the three credential checks surface as
/// distinct statuses: 404 unknown account, 401 inactive, 400 bad password.
/// Everything else falls through to the default mapping.
fn map_login_error(err: AuthError) -> ApiError {
    match err {
        AuthError::AccountNotFound => ApiError::NotFound(err.to_string()),
        AuthError::AccountInactive => ApiError::Unauthorized(err.to_string()),
        other => other.into(),
    }
}

/// Login handler
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Response
///
/// ```json
/// { "accessToken": "eyJ...", "user": { "id": 1, "email": "..." } }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No account with this email
/// - `401 Unauthorized`: Account is inactive
/// - `400 Bad Request`: Password does not match
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Session>> {
    req.validate()?;

    let session = state
        .gateway
        .login(&req.email, &req.password)
        .await
        .map_err(map_login_error)?;

    Ok(Json(session))
}

/// Forget-password handler
///
/// Issues a 5-minute reset token and mails the link. The token is not
/// stored; it simply expires.
///
/// # Errors
///
/// - `400 Bad Request`: No account with this email
/// - `409 Conflict`: Account is inactive
/// - `422 Unprocessable Entity`: Mail dispatch failed
pub async fn forget_password(
    State(state): State<AppState>,
    Json(req): Json<ForgetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    state.gateway.forget_password(&req.email).await?;

    Ok(MessageResponse::new("Reset link sent"))
}

/// Reset-password handler
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid or expired token
/// - `400 Bad Request` / `409 Conflict`: Account missing or inactive
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    state
        .gateway
        .reset_password(&req.token, &req.new_password)
        .await?;

    Ok(MessageResponse::new("Password updated"))
}

/// Change-password handler (gated)
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Current password does not match
pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    state
        .gateway
        .change_password(principal.account_id, &req.current_password, &req.new_password)
        .await?;

    Ok(MessageResponse::new("Password updated"))
}

/// Current-principal handler (gated)
///
/// Returns the identity the authorization gate resolved for this request.
pub async fn me(Extension(principal): Extension<Principal>) -> ApiResult<Json<Principal>> {
    Ok(Json(principal))
}
