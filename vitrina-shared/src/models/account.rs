/// Account model and Postgres directory
///
/// Accounts are the only credential-bearing records in the system. The
/// password hash is stored opaque and never leaves the auth gateway or the
/// password hasher; everything handed to HTTP responses goes through
/// [`AccountSummary`], which excludes it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id BIGSERIAL PRIMARY KEY,
///     dni TEXT NOT NULL,
///     name TEXT NOT NULL,
///     last_name TEXT NOT NULL,
///     email TEXT NOT NULL,
///     phone TEXT NOT NULL DEFAULT '',
///     company TEXT,
///     password_hash VARCHAR(255) NOT NULL,
///     role_id BIGINT NOT NULL REFERENCES roles(id),
///     status BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT accounts_dni_key UNIQUE (dni),
///     CONSTRAINT accounts_email_key UNIQUE (email)
/// );
/// ```
///
/// Email lookups are exact-match and case-sensitive; the filtered listing is
/// the only place substring/case-insensitive matching applies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{AccountDirectory, DuplicateField, StoreError};

/// Account record as stored
///
/// `status = false` is the soft-deleted/blocked state: it forbids login,
/// password reset completion and authorization-gate passage. There is no
/// reactivation path.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Generated numeric id
    pub id: i64,

    /// National identity document number, unique
    pub dni: String,

    /// First name
    pub name: String,

    /// Last name
    pub last_name: String,

    /// Email address, unique, exact-match key
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Company name, set for client-type accounts
    pub company: Option<String>,

    /// Argon2id password hash, never plaintext
    pub password_hash: String,

    /// Role this account holds
    pub role_id: i64,

    /// Active flag; false means soft-deleted/blocked
    pub status: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Display name: the company name when present, else "name last_name"
    pub fn complete_name(&self) -> String {
        match &self.company {
            Some(company) if !company.is_empty() => company.clone(),
            _ => format!("{} {}", self.name, self.last_name),
        }
    }
}

/// Account joined with its role name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountWithRole {
    #[sqlx(flatten)]
    pub account: Account,

    /// Name of the role referenced by `account.role_id`
    pub role_name: String,
}

/// Input for inserting a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub dni: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    /// Already-hashed credential (NOT a plaintext password!)
    pub password_hash: String,
    pub role_id: i64,
}

/// Partial update; only populated fields are written
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<i64>,
    pub status: Option<bool>,
}

/// Account projection safe to expose over HTTP (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: i64,
    pub dni: String,
    pub complete_name: String,
    pub email: String,
    pub status: bool,
    pub role: String,
}

impl From<AccountWithRole> for AccountSummary {
    fn from(row: AccountWithRole) -> Self {
        Self {
            id: row.account.id,
            dni: row.account.dni.clone(),
            complete_name: row.account.complete_name(),
            email: row.account.email,
            status: row.account.status,
            role: row.role_name,
        }
    }
}

/// Filter for the paged account listing
///
/// The `*_contains` fields match case-insensitively on substrings;
/// `exclude_role_id` drops accounts holding that role (used to keep
/// storefront clients out of the staff listing). `page` is zero-based.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    pub name_contains: Option<String>,
    pub dni_contains: Option<String>,
    pub email_contains: Option<String>,
    pub exclude_role_id: Option<i64>,
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// One page of listing results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Postgres-backed [`AccountDirectory`]
#[derive(Debug, Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "a.id, a.dni, a.name, a.last_name, a.email, a.phone, a.company, \
     a.password_hash, a.role_id, a.status, a.created_at, a.updated_at";

/// Maps a unique-constraint violation to the identity field that collided
///
/// The store's constraints are the sole source of truth for uniqueness; the
/// gateway's existence pre-checks only produce a faster user-facing message.
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            if constraint.contains("dni") {
                return StoreError::Duplicate(DuplicateField::Dni);
            }
            if constraint.contains("email") {
                return StoreError::Duplicate(DuplicateField::Email);
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountWithRole>, StoreError> {
        let row = sqlx::query_as::<_, AccountWithRole>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}, r.name AS role_name
            FROM accounts a
            JOIN roles r ON r.id = a.role_id
            WHERE a.email = $1
            "#,
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, dni, name, last_name, email, phone, company,
                   password_hash, role_id, status, created_at, updated_at
            FROM accounts
            WHERE dni = $1
            "#,
        )
        .bind(dni)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountWithRole>, StoreError> {
        let row = sqlx::query_as::<_, AccountWithRole>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}, r.name AS role_name
            FROM accounts a
            JOIN roles r ON r.id = a.role_id
            WHERE a.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (dni, name, last_name, email, phone, company, password_hash, role_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, dni, name, last_name, email, phone, company,
                      password_hash, role_id, status, created_at, updated_at
            "#,
        )
        .bind(account.dni)
        .bind(account.name)
        .bind(account.last_name)
        .bind(account.email)
        .bind(account.phone)
        .bind(account.company)
        .bind(account.password_hash)
        .bind(account.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row)
    }

    async fn update(&self, id: i64, fields: AccountUpdate) -> Result<Option<Account>, StoreError> {
        // Build the UPDATE dynamically from the populated fields
        let mut query = String::from("UPDATE accounts SET updated_at = NOW()");
        let mut bind_count = 1;

        if fields.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${bind_count}"));
        }
        if fields.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${bind_count}"));
        }
        if fields.company.is_some() {
            bind_count += 1;
            query.push_str(&format!(", company = ${bind_count}"));
        }
        if fields.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${bind_count}"));
        }
        if fields.role_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role_id = ${bind_count}"));
        }
        if fields.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${bind_count}"));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, dni, name, last_name, email, phone, company, \
             password_hash, role_id, status, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Account>(&query).bind(id);

        if let Some(name) = fields.name {
            q = q.bind(name);
        }
        if let Some(phone) = fields.phone {
            q = q.bind(phone);
        }
        if let Some(company) = fields.company {
            q = q.bind(company);
        }
        if let Some(password_hash) = fields.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role_id) = fields.role_id {
            q = q.bind(role_id);
        }
        if let Some(status) = fields.status {
            q = q.bind(status);
        }

        let row = q.fetch_optional(&self.pool).await?;

        Ok(row)
    }

    async fn list_by_role(
        &self,
        role_id: i64,
        active_only: bool,
    ) -> Result<Vec<AccountSummary>, StoreError> {
        let rows = sqlx::query_as::<_, AccountWithRole>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}, r.name AS role_name
            FROM accounts a
            JOIN roles r ON r.id = a.role_id
            WHERE a.role_id = $1 AND (a.status = TRUE OR $2 = FALSE)
            ORDER BY a.created_at DESC
            "#,
        ))
        .bind(role_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AccountSummary::from).collect())
    }

    async fn list_filtered(
        &self,
        filter: AccountFilter,
    ) -> Result<Page<AccountSummary>, StoreError> {
        let limit = filter.limit.max(1);
        let offset = filter.page.max(0) * limit;

        const WHERE_CLAUSE: &str = r#"
            WHERE ($1::text IS NULL OR a.name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR a.dni ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR a.email ILIKE '%' || $3 || '%')
              AND ($4::bigint IS NULL OR a.role_id <> $4)
        "#;

        let rows = sqlx::query_as::<_, AccountWithRole>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}, r.name AS role_name
            FROM accounts a
            JOIN roles r ON r.id = a.role_id
            {WHERE_CLAUSE}
            ORDER BY a.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        ))
        .bind(&filter.name_contains)
        .bind(&filter.dni_contains)
        .bind(&filter.email_contains)
        .bind(filter.exclude_role_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM accounts a {WHERE_CLAUSE}"
        ))
        .bind(&filter.name_contains)
        .bind(&filter.dni_contains)
        .bind(&filter.email_contains)
        .bind(filter.exclude_role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page {
            results: rows.into_iter().map(AccountSummary::from).collect(),
            total,
            page: filter.page,
            limit,
        })
    }
}
