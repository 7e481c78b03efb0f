/// Account provisioning and administration endpoints
///
/// # Endpoints
///
/// - `POST   /accounts` - Provision a staff account (gated)
/// - `POST   /accounts/client` - Client self-signup (public)
/// - `POST   /accounts/search` - Filtered, paged listing (gated)
/// - `GET    /accounts/role/:role_id` - Accounts holding a role (gated)
/// - `GET    /accounts/:id` - Single account (gated)
/// - `PATCH  /accounts/:id/role` - Move an account to another role (gated)
/// - `DELETE /accounts/:id` - Soft delete (gated)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use vitrina_shared::auth::gateway::{NewClientAccount, NewStaffAccount};
use vitrina_shared::models::{AccountFilter, AccountSummary, Page};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Staff account creation request
///
/// The initial password is derived from the dni by the gateway; no
/// credential travels in this request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "Dni is required"))]
    pub dni: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    pub company: Option<String>,

    pub role_id: i64,
}

/// Client self-signup request
///
/// The role is fixed to the client role and the initial credential is
/// generated and mailed; neither appears in the request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientAccountRequest {
    #[validate(length(min = 1, message = "Dni is required"))]
    pub dni: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    pub company: Option<String>,
}

/// Role change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub role_id: i64,
}

/// Query options for the by-role listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListByRoleQuery {
    /// When true, soft-deleted accounts are filtered out
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// Staff provisioning handler (gated)
///
/// # Endpoint
///
/// ```text
/// POST /accounts
/// Content-Type: application/json
///
/// {
///   "dni": "12345678",
///   "name": "Ana",
///   "lastName": "Diaz",
///   "email": "ana@example.com",
///   "phone": "555-0101",
///   "roleId": 3
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Role missing or inactive
/// - `422 Unprocessable Entity`: Duplicate dni or email
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountSummary>)> {
    req.validate()?;

    let summary = state
        .gateway
        .create_account(NewStaffAccount {
            dni: req.dni,
            name: req.name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            role_id: req.role_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Client self-signup handler (public)
///
/// # Errors
///
/// - `404 Not Found`: Client role missing or inactive
/// - `422 Unprocessable Entity`: Duplicate dni or email
pub async fn create_client_account(
    State(state): State<AppState>,
    Json(req): Json<CreateClientAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountSummary>)> {
    req.validate()?;

    let summary = state
        .gateway
        .create_client_account(NewClientAccount {
            dni: req.dni,
            name: req.name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            company: req.company,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Filtered listing handler (gated)
///
/// Accepts the filter in the body so the admin UI can post its search form
/// as-is. Substring matches are case-insensitive; `page` is zero-based.
pub async fn search_accounts(
    State(state): State<AppState>,
    Json(filter): Json<AccountFilter>,
) -> ApiResult<Json<Page<AccountSummary>>> {
    let page = state.accounts.list_filtered(filter).await?;

    Ok(Json(page))
}

/// By-role listing handler (gated)
pub async fn list_by_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Query(query): Query<ListByRoleQuery>,
) -> ApiResult<Json<Vec<AccountSummary>>> {
    let accounts = state
        .accounts
        .list_by_role(role_id, query.active_only)
        .await?;

    Ok(Json(accounts))
}

/// Single-account handler (gated)
///
/// # Errors
///
/// - `404 Not Found`: No account with this id
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AccountSummary>> {
    let summary = state
        .accounts
        .find_by_id(id)
        .await?
        .map(AccountSummary::from)
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(summary))
}

/// Role change handler (gated)
///
/// # Errors
///
/// - `400 Bad Request`: No account with this id
/// - `404 Not Found`: Role missing or inactive
pub async fn change_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<Json<AccountSummary>> {
    let summary = state.gateway.change_role(id, req.role_id).await?;

    Ok(Json(summary))
}

/// Soft-delete handler (gated)
///
/// Flips the account's status; sessions die at the gate on the next
/// request.
///
/// # Errors
///
/// - `400 Bad Request`: No account with this id
pub async fn deactivate_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.gateway.deactivate(id).await?;

    Ok(Json(serde_json::json!({ "message": "Account deactivated" })))
}
