/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts to the
/// appropriate status code with a JSON `{error, message}` body.
///
/// The `From<AuthError>` impl carries the default kind-to-status mapping;
/// the login route applies its endpoint-specific overrides on top (see
/// `routes::auth::map_login_error`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use vitrina_shared::auth::error::AuthError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409) - e.g., inactive account
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422) - domain rejections such as duplicates,
    /// bad reset tokens or a password mismatch
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Unprocessable entity (422) - request body validation errors
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", msg, None)
            }
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Default mapping from auth errors to HTTP statuses
///
/// Statuses are the contract: clients branch on them. Routes with
/// endpoint-specific mappings (login) translate before this impl applies.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountNotFound => ApiError::BadRequest(err.to_string()),
            AuthError::AccountInactive => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::BadRequest(err.to_string()),
            AuthError::CurrentPasswordMismatch => ApiError::Unprocessable(err.to_string()),
            AuthError::InvalidOrExpiredToken => ApiError::Unprocessable(err.to_string()),
            AuthError::DuplicateAccount(_) => ApiError::Unprocessable(err.to_string()),
            AuthError::RoleNotFound => ApiError::NotFound(err.to_string()),
            AuthError::MailDispatchFailed => ApiError::Unprocessable(err.to_string()),
            AuthError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            AuthError::Persistence(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert store errors to API errors
impl From<vitrina_shared::models::StoreError> for ApiError {
    fn from(err: vitrina_shared::models::StoreError) -> Self {
        match err {
            vitrina_shared::models::StoreError::Duplicate(_) => {
                ApiError::Unprocessable(err.to_string())
            }
            vitrina_shared::models::StoreError::Database(db_err) => {
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
        }
    }
}

/// Convert request body validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationErrorDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}
