/// Account and role directories
///
/// The identity core talks to persistence through two narrow contracts:
///
/// - [`AccountDirectory`]: lookup and mutation of account records by id,
///   email (unique) or dni (unique), with the role joined where callers
///   need it
/// - [`RoleDirectory`]: lookup of reference-data role records
///
/// The Postgres implementations live in [`account`] and [`role`]. Uniqueness
/// of `email` and `dni` is enforced by the backing store at write time, never
/// by the service layer: concurrent creates with the same identifier race
/// past any existence pre-check, and exactly one writer wins at the unique
/// constraint. [`StoreError::Duplicate`] is how the losers observe it.

pub mod account;
#[cfg(test)]
pub(crate) mod memory;
pub mod role;

use async_trait::async_trait;
use std::fmt;

pub use account::{
    Account, AccountFilter, AccountSummary, AccountUpdate, AccountWithRole, NewAccount, Page,
};
pub use role::Role;

/// Which unique identity field collided on a duplicate write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Dni,
    Email,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::Dni => write!(f, "dni"),
            DuplicateField::Email => write!(f, "email"),
        }
    }
}

/// Error type for directory operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint on `dni` or `email` rejected the write
    #[error("an account with this {0} already exists")]
    Duplicate(DuplicateField),

    /// Opaque passthrough from the backing store
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Lookup and mutation of account records
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Finds an account by its exact email, with the role name joined
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountWithRole>, StoreError>;

    /// Finds an account by its exact dni
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Account>, StoreError>;

    /// Finds an account by id, with the role name joined
    async fn find_by_id(&self, id: i64) -> Result<Option<AccountWithRole>, StoreError>;

    /// Inserts a new account
    ///
    /// Returns [`StoreError::Duplicate`] when the store's unique constraints
    /// on `dni` or `email` reject the insert.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Applies a partial update; only the populated fields change
    ///
    /// Returns `None` when no account has the given id.
    async fn update(&self, id: i64, fields: AccountUpdate) -> Result<Option<Account>, StoreError>;

    /// Lists accounts holding the given role
    async fn list_by_role(
        &self,
        role_id: i64,
        active_only: bool,
    ) -> Result<Vec<AccountSummary>, StoreError>;

    /// Lists accounts matching the filter, newest first
    async fn list_filtered(&self, filter: AccountFilter)
        -> Result<Page<AccountSummary>, StoreError>;
}

/// Lookup of role reference data
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, StoreError>;

    /// Case-insensitive, substring-tolerant lookup by role name
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;
}
