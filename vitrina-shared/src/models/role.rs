/// Role model and Postgres directory
///
/// Roles are reference data seeded by migration (`ADMIN`, `CLIENT`,
/// `SELLER`). Lookup by name is case-insensitive and substring-tolerant,
/// which is how the gateway resolves the canonical client role for
/// self-signup accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{RoleDirectory, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,

    /// Unique role name, matched case-insensitively on lookup
    pub name: String,

    /// Active flag; a disabled role cannot be assigned to new accounts
    pub status: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postgres-backed [`RoleDirectory`]
#[derive(Debug, Clone)]
pub struct PgRoleDirectory {
    pool: PgPool,
}

impl PgRoleDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDirectory for PgRoleDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, status, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM roles
            WHERE name ILIKE '%' || $1 || '%'
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }
}
