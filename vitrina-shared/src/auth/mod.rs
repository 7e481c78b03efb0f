/// Identity and access-control core
///
/// # Modules
///
/// - [`password`]: Argon2id password custody (hash/verify, credential generation)
/// - [`token`]: stateless signed-token issuance and verification (HS256)
/// - [`gateway`]: login, password-reset/change and account-creation workflows
/// - [`middleware`]: per-request authorization gate resolving tokens to principals
/// - [`error`]: the externally-visible error taxonomy
///
/// # Design notes
///
/// Every operation is single-shot: each step is either a pure computation or
/// a single store call, so cancellation needs no cleanup. Tokens are pure
/// functions of signature and expiry with no server-side revocation list.
/// Password hashing is the one deliberately CPU-expensive step and runs on
/// the blocking pool so it never stalls the I/O path.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::Duration;
/// use vitrina_shared::auth::{gateway::AuthGateway, token::TokenCodec};
/// # async fn example(
/// #     accounts: Arc<dyn vitrina_shared::models::AccountDirectory>,
/// #     roles: Arc<dyn vitrina_shared::models::RoleDirectory>,
/// #     mailer: Arc<dyn vitrina_shared::mail::MailDispatcher>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let codec = Arc::new(TokenCodec::new("secret-at-least-32-bytes-long!!!", Duration::hours(24)));
/// let gateway = AuthGateway::new(accounts, roles, codec, mailer);
/// let session = gateway.login("a@b.com", "Secret123").await?;
/// println!("token: {}", session.access_token);
/// # Ok(())
/// # }
/// ```

pub mod error;
pub mod gateway;
pub mod middleware;
pub mod password;
pub mod token;
