/// In-memory directories used by flow tests
///
/// Behaves like the Postgres implementations as far as the auth core can
/// observe: exact-match unique lookups, role joins, and duplicate rejection
/// at insert time.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::account::{
    Account, AccountFilter, AccountSummary, AccountUpdate, AccountWithRole, NewAccount, Page,
};
use super::role::Role;
use super::{AccountDirectory, DuplicateField, RoleDirectory, StoreError};

pub struct MemDirectory {
    state: Mutex<MemState>,
}

struct MemState {
    accounts: Vec<Account>,
    roles: Vec<Role>,
    next_id: i64,
}

fn role(id: i64, name: &str, status: bool) -> Role {
    Role {
        id,
        name: name.to_string(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

impl MemDirectory {
    /// Creates a directory seeded with the migration's reference roles
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemState {
                accounts: Vec::new(),
                roles: vec![
                    role(1, "ADMIN", true),
                    role(2, "CLIENT", true),
                    role(3, "SELLER", true),
                ],
                next_id: 1,
            }),
        }
    }

    pub fn add_role(&self, id: i64, name: &str, status: bool) {
        self.state.lock().unwrap().roles.push(role(id, name, status));
    }

    /// Inserts directly, bypassing uniqueness, for test setup
    pub fn seed_account(&self, new: NewAccount, status: bool) -> Account {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let account = Account {
            id,
            dni: new.dni,
            name: new.name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            password_hash: new.password_hash,
            role_id: new.role_id,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.accounts.push(account.clone());
        account
    }

    pub fn password_hash_of(&self, id: i64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.password_hash.clone())
    }

    fn with_role(&self, account: Account) -> AccountWithRole {
        let role_name = self
            .state
            .lock()
            .unwrap()
            .roles
            .iter()
            .find(|r| r.id == account.role_id)
            .map(|r| r.name.clone())
            .unwrap_or_default();
        AccountWithRole { account, role_name }
    }
}

#[async_trait]
impl AccountDirectory for MemDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountWithRole>, StoreError> {
        let found = {
            let state = self.state.lock().unwrap();
            state.accounts.iter().find(|a| a.email == email).cloned()
        };
        Ok(found.map(|a| self.with_role(a)))
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<Account>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.iter().find(|a| a.dni == dni).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountWithRole>, StoreError> {
        let found = {
            let state = self.state.lock().unwrap();
            state.accounts.iter().find(|a| a.id == id).cloned()
        };
        Ok(found.map(|a| self.with_role(a)))
    }

    async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        {
            let state = self.state.lock().unwrap();
            if state.accounts.iter().any(|a| a.dni == new.dni) {
                return Err(StoreError::Duplicate(DuplicateField::Dni));
            }
            if state.accounts.iter().any(|a| a.email == new.email) {
                return Err(StoreError::Duplicate(DuplicateField::Email));
            }
        }
        Ok(self.seed_account(new, true))
    }

    async fn update(&self, id: i64, fields: AccountUpdate) -> Result<Option<Account>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(account) = state.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = fields.name {
            account.name = name;
        }
        if let Some(phone) = fields.phone {
            account.phone = phone;
        }
        if let Some(company) = fields.company {
            account.company = Some(company);
        }
        if let Some(password_hash) = fields.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(role_id) = fields.role_id {
            account.role_id = role_id;
        }
        if let Some(status) = fields.status {
            account.status = status;
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn list_by_role(
        &self,
        role_id: i64,
        active_only: bool,
    ) -> Result<Vec<AccountSummary>, StoreError> {
        let matching: Vec<Account> = {
            let state = self.state.lock().unwrap();
            state
                .accounts
                .iter()
                .filter(|a| a.role_id == role_id && (a.status || !active_only))
                .cloned()
                .collect()
        };
        Ok(matching
            .into_iter()
            .map(|a| AccountSummary::from(self.with_role(a)))
            .collect())
    }

    async fn list_filtered(
        &self,
        filter: AccountFilter,
    ) -> Result<Page<AccountSummary>, StoreError> {
        fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            }
        }

        let matching: Vec<Account> = {
            let state = self.state.lock().unwrap();
            state
                .accounts
                .iter()
                .filter(|a| {
                    contains_ci(&a.name, &filter.name_contains)
                        && contains_ci(&a.dni, &filter.dni_contains)
                        && contains_ci(&a.email, &filter.email_contains)
                        && filter.exclude_role_id != Some(a.role_id)
                })
                .cloned()
                .collect()
        };

        let total = matching.len() as i64;
        let limit = filter.limit.max(1);
        let offset = (filter.page.max(0) * limit) as usize;
        let results = matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .map(|a| AccountSummary::from(self.with_role(a)))
            .collect();

        Ok(Page {
            results,
            total,
            page: filter.page,
            limit,
        })
    }
}

#[async_trait]
impl RoleDirectory for MemDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let state = self.state.lock().unwrap();
        let needle = name.to_lowercase();
        Ok(state
            .roles
            .iter()
            .find(|r| r.name.to_lowercase().contains(&needle))
            .cloned())
    }
}
