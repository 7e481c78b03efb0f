/// API route handlers
///
/// - `health`: Liveness check
/// - `auth`: Login, password reset/change, current principal
/// - `accounts`: Account provisioning and administration

pub mod accounts;
pub mod auth;
pub mod health;
