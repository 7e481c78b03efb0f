/// Application state, router builder and the authorization gate
///
/// # Example
///
/// ```no_run
/// use vitrina_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = vitrina_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use vitrina_shared::auth::{gateway::AuthGateway, middleware, token::TokenCodec};
use vitrina_shared::mail::SmtpMailer;
use vitrina_shared::models::account::PgAccountDirectory;
use vitrina_shared::models::role::PgRoleDirectory;
use vitrina_shared::models::{AccountDirectory, RoleDirectory};

use crate::config::Config;
use crate::error::ApiError;

/// Name of the cookie checked for a session token before the
/// `Authorization` header
pub const AUTH_COOKIE: &str = "Authentication";

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Account store
    pub accounts: Arc<dyn AccountDirectory>,

    /// Role store
    pub roles: Arc<dyn RoleDirectory>,

    /// Token codec shared by the gateway and the gate
    pub codec: Arc<TokenCodec>,

    /// Authentication and provisioning workflows
    pub gateway: Arc<AuthGateway>,
}

impl AppState {
    /// Creates new application state wired to Postgres and SMTP
    pub fn new(db: PgPool, config: Config) -> Self {
        let accounts: Arc<dyn AccountDirectory> = Arc::new(PgAccountDirectory::new(db.clone()));
        let roles: Arc<dyn RoleDirectory> = Arc::new(PgRoleDirectory::new(db.clone()));
        let codec = Arc::new(TokenCodec::new(
            config.jwt.secret.clone(),
            Duration::hours(config.jwt.session_ttl_hours),
        ));
        let mailer = Arc::new(SmtpMailer::new(config.mail.clone()));
        let gateway = Arc::new(AuthGateway::new(
            accounts.clone(),
            roles.clone(),
            codec.clone(),
            mailer,
        ));

        Self {
            db,
            config: Arc::new(config),
            accounts,
            roles,
            codec,
            gateway,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /auth/
/// │   ├── POST /login                # (public)
/// │   ├── POST /forget-password      # (public)
/// │   ├── POST /reset-password       # (public)
/// │   ├── POST /change-password      # (gated)
/// │   └── GET  /me                   # (gated)
/// └── /accounts/
///     ├── POST   /client             # Client self-signup (public)
///     ├── POST   /                   # Staff provisioning (gated)
///     ├── POST   /search             # Filtered listing (gated)
///     ├── GET    /role/:role_id      # Accounts by role (gated)
///     ├── GET    /:id                # Single account (gated)
///     ├── PATCH  /:id/role           # Role change (gated)
///     └── DELETE /:id                # Soft delete (gated)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authorization gate (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes reachable without a session
    let public_auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/forget-password", post(routes::auth::forget_password))
        .route("/reset-password", post(routes::auth::reset_password));

    // Auth routes behind the gate
    let gated_auth_routes = Router::new()
        .route("/change-password", post(routes::auth::change_password))
        .route("/me", get(routes::auth::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authorization_gate,
        ));

    // Client self-signup is the one public account route
    let public_account_routes =
        Router::new().route("/client", post(routes::accounts::create_client_account));

    let gated_account_routes = Router::new()
        .route("/", post(routes::accounts::create_account))
        .route("/search", post(routes::accounts::search_accounts))
        .route("/role/:role_id", get(routes::accounts::list_by_role))
        .route(
            "/:id",
            get(routes::accounts::get_account).delete(routes::accounts::deactivate_account),
        )
        .route("/:id/role", patch(routes::accounts::change_role))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authorization_gate,
        ));

    let auth_routes = public_auth_routes.merge(gated_auth_routes);
    let account_routes = public_account_routes.merge(gated_account_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/accounts", account_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Pulls the session token out of a request
///
/// The `Authentication` cookie wins when both carriers are present; the
/// `Authorization: Bearer` header is the fallback.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Authorization gate middleware layer
///
/// Extracts the token, verifies it, re-resolves the account and injects the
/// resulting `Principal` into request extensions. Any failure is 401.
async fn authorization_gate(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers());

    let principal = middleware::authorize(&state.accounts, &state.codec, token.as_deref()).await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
