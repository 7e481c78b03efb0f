/// Authentication and account-provisioning workflows
///
/// [`AuthGateway`] owns every flow that touches a credential: login, the
/// forget/reset password pair, authenticated password change, and the two
/// account-creation paths (staff accounts provisioned by an admin, client
/// accounts created through self-signup).
///
/// # Check ordering
///
/// Login validates in a fixed order and stops at the first failure:
/// existence, then active status, then password comparison. The order is
/// observable through the error kinds and is part of the contract.
///
/// # Credential policy
///
/// Staff accounts start with a deterministic credential derived from the
/// dni; client accounts get a random generated credential delivered by
/// mail. Only hashes are ever persisted.

use std::sync::Arc;

use serde::Serialize;

use crate::mail::MailDispatcher;
use crate::models::{
    AccountDirectory, AccountSummary, AccountUpdate, NewAccount, RoleDirectory,
};

use super::error::AuthError;
use super::password;
use super::token::TokenCodec;

/// Role resolved by name for self-signup accounts
const CLIENT_ROLE: &str = "client";

/// Length of the random initial credential mailed to new clients
const GENERATED_CREDENTIAL_LEN: usize = 12;

/// Successful login result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: AccountSummary,
}

/// Input for admin-provisioned staff accounts
#[derive(Debug, Clone)]
pub struct NewStaffAccount {
    pub dni: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub role_id: i64,
}

/// Input for self-signup client accounts; role and credential are assigned
/// by the gateway
#[derive(Debug, Clone)]
pub struct NewClientAccount {
    pub dni: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
}

pub struct AuthGateway {
    accounts: Arc<dyn AccountDirectory>,
    roles: Arc<dyn RoleDirectory>,
    codec: Arc<TokenCodec>,
    mailer: Arc<dyn MailDispatcher>,
}

impl AuthGateway {
    pub fn new(
        accounts: Arc<dyn AccountDirectory>,
        roles: Arc<dyn RoleDirectory>,
        codec: Arc<TokenCodec>,
        mailer: Arc<dyn MailDispatcher>,
    ) -> Self {
        Self {
            accounts,
            roles,
            codec,
            mailer,
        }
    }

    /// Validates credentials and issues a session token
    ///
    /// Checks run in order: account exists, account active, password
    /// matches. Each failure has its own kind so the boundary can map them
    /// to distinct statuses.
    pub async fn login(&self, email: &str, password_plain: &str) -> Result<Session, AuthError> {
        let found = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !found.account.status {
            return Err(AuthError::AccountInactive);
        }

        let matches = password::verify_async(
            password_plain.to_string(),
            found.account.password_hash.clone(),
        )
        .await;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token =
            self.codec
                .issue_session(found.account.id, &found.account.email, found.account.role_id)?;

        Ok(Session {
            access_token,
            user: AccountSummary::from(found),
        })
    }

    /// Issues a short-lived reset token and mails the reset link
    ///
    /// Mail dispatch must succeed; an undeliverable link would leave the
    /// caller stuck, so the failure is surfaced. The token itself is not
    /// recorded anywhere and simply expires.
    pub async fn forget_password(&self, email: &str) -> Result<(), AuthError> {
        let found = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !found.account.status {
            return Err(AuthError::AccountInactive);
        }

        let token = self
            .codec
            .issue_reset(found.account.id, &found.account.email)?;

        // The reset mail is addressed to the account's email, which also
        // serves as the display name
        self.mailer
            .send_reset_link(&found.account.email, &found.account.email, &token)
            .await
            .map_err(|err| {
                tracing::error!(email, error = %err, "reset mail dispatch failed");
                AuthError::MailDispatchFailed
            })
    }

    /// Consumes a reset token and stores a new password hash
    ///
    /// The token is verified first, uniformly, before any account state is
    /// consulted. The account is re-resolved by id: a reset link for a
    /// since-deleted or deactivated account is useless.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let claims = self.codec.verify(token)?;

        let found = self
            .accounts
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !found.account.status {
            return Err(AuthError::AccountInactive);
        }

        let password_hash = password::hash_async(new_password.to_string()).await?;
        self.accounts
            .update(
                found.account.id,
                AccountUpdate {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(())
    }

    /// Changes the password of an already-authenticated account
    ///
    /// The current password is re-verified even though the caller holds a
    /// valid session, so a hijacked session cannot rotate the credential.
    pub async fn change_password(
        &self,
        account_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let found = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !found.account.status {
            return Err(AuthError::AccountInactive);
        }

        let matches = password::verify_async(
            current_password.to_string(),
            found.account.password_hash.clone(),
        )
        .await;
        if !matches {
            return Err(AuthError::CurrentPasswordMismatch);
        }

        let password_hash = password::hash_async(new_password.to_string()).await?;
        self.accounts
            .update(
                account_id,
                AccountUpdate {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(())
    }

    /// Creates a staff account with a deterministic initial credential
    ///
    /// The initial password is the account's dni; the admin hands it over
    /// out of band and the user is expected to change it. The role must
    /// exist and be active. Pre-checks give fast duplicate feedback, but
    /// the store's unique constraints remain the source of truth under
    /// concurrency.
    pub async fn create_account(
        &self,
        input: NewStaffAccount,
    ) -> Result<AccountSummary, AuthError> {
        let role = self
            .roles
            .find_by_id(input.role_id)
            .await?
            .filter(|r| r.status)
            .ok_or(AuthError::RoleNotFound)?;

        self.check_duplicates(&input.dni, &input.email).await?;

        let password_hash = password::hash_async(input.dni.clone()).await?;
        let account = self
            .accounts
            .create(NewAccount {
                dni: input.dni,
                name: input.name,
                last_name: input.last_name,
                email: input.email,
                phone: input.phone,
                company: input.company,
                password_hash,
                role_id: role.id,
            })
            .await?;

        tracing::info!(account_id = account.id, role = %role.name, "staff account created");

        self.summary_of(account.id).await
    }

    /// Creates a self-signup client account with a random mailed credential
    ///
    /// The welcome mail is fire-and-forget: the account exists either way
    /// and the client can fall back to the reset flow, so dispatch failure
    /// is logged and not surfaced.
    pub async fn create_client_account(
        &self,
        input: NewClientAccount,
    ) -> Result<AccountSummary, AuthError> {
        let role = self
            .roles
            .find_by_name(CLIENT_ROLE)
            .await?
            .filter(|r| r.status)
            .ok_or(AuthError::RoleNotFound)?;

        self.check_duplicates(&input.dni, &input.email).await?;

        let credential = password::generate_credential(GENERATED_CREDENTIAL_LEN);
        let password_hash = password::hash_async(credential.clone()).await?;

        let account = self
            .accounts
            .create(NewAccount {
                dni: input.dni,
                name: input.name,
                last_name: input.last_name,
                email: input.email,
                phone: input.phone,
                company: input.company,
                password_hash,
                role_id: role.id,
            })
            .await?;

        if let Err(err) = self
            .mailer
            .send_welcome(&account.email, &account.name, &credential)
            .await
        {
            tracing::warn!(account_id = account.id, error = %err, "welcome mail dispatch failed");
        }

        tracing::info!(account_id = account.id, "client account created");

        self.summary_of(account.id).await
    }

    /// Moves an account to a different role
    pub async fn change_role(
        &self,
        account_id: i64,
        role_id: i64,
    ) -> Result<AccountSummary, AuthError> {
        self.roles
            .find_by_id(role_id)
            .await?
            .filter(|r| r.status)
            .ok_or(AuthError::RoleNotFound)?;

        self.accounts
            .update(
                account_id,
                AccountUpdate {
                    role_id: Some(role_id),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        self.summary_of(account_id).await
    }

    /// Soft-deletes an account by flipping its status
    ///
    /// Existing session tokens for the account die at the authorization
    /// gate, which re-checks status per request.
    pub async fn deactivate(&self, account_id: i64) -> Result<(), AuthError> {
        self.accounts
            .update(
                account_id,
                AccountUpdate {
                    status: Some(false),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(())
    }

    async fn check_duplicates(&self, dni: &str, email: &str) -> Result<(), AuthError> {
        use crate::models::DuplicateField;

        if self.accounts.find_by_dni(dni).await?.is_some() {
            return Err(AuthError::DuplicateAccount(DuplicateField::Dni));
        }
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateAccount(DuplicateField::Email));
        }
        Ok(())
    }

    async fn summary_of(&self, account_id: i64) -> Result<AccountSummary, AuthError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .map(AccountSummary::from)
            .ok_or(AuthError::AccountNotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;

    use crate::mail::{MailDispatcher, MailError};
    use crate::models::memory::MemDirectory;
    use crate::models::{
        Account, AccountWithRole, DuplicateField, NewAccount, Page, StoreError,
    };
    use crate::models::{AccountFilter, AccountSummary, AccountUpdate};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Sent {
        Reset {
            to: String,
            display_name: String,
            token: String,
        },
        Welcome {
            to: String,
            credential: String,
        },
    }

    struct RecordingMailer {
        sent: Mutex<Vec<Sent>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailDispatcher for RecordingMailer {
        async fn send_reset_link(
            &self,
            to: &str,
            display_name: &str,
            token: &str,
        ) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("relay down".to_string()));
            }
            self.sent.lock().unwrap().push(Sent::Reset {
                to: to.to_string(),
                display_name: display_name.to_string(),
                token: token.to_string(),
            });
            Ok(())
        }

        async fn send_welcome(
            &self,
            to: &str,
            _name: &str,
            credential: &str,
        ) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("relay down".to_string()));
            }
            self.sent.lock().unwrap().push(Sent::Welcome {
                to: to.to_string(),
                credential: credential.to_string(),
            });
            Ok(())
        }
    }

    struct Fixture {
        directory: Arc<MemDirectory>,
        mailer: Arc<RecordingMailer>,
        codec: Arc<TokenCodec>,
        gateway: AuthGateway,
    }

    fn fixture_with_mailer(mailer: RecordingMailer) -> Fixture {
        let directory = Arc::new(MemDirectory::new());
        let mailer = Arc::new(mailer);
        let codec = Arc::new(TokenCodec::new(
            "test-secret-key-at-least-32-bytes-long",
            Duration::hours(24),
        ));
        let gateway = AuthGateway::new(
            directory.clone(),
            directory.clone(),
            codec.clone(),
            mailer.clone(),
        );
        Fixture {
            directory,
            mailer,
            codec,
            gateway,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_mailer(RecordingMailer::new())
    }

    fn seed(fx: &Fixture, email: &str, password: &str, status: bool) -> Account {
        fx.directory.seed_account(
            NewAccount {
                dni: format!("dni-{email}"),
                name: "Ana".to_string(),
                last_name: "Diaz".to_string(),
                email: email.to_string(),
                phone: "555-0101".to_string(),
                company: None,
                password_hash: password::hash(password).unwrap(),
                role_id: 1,
            },
            status,
        )
    }

    fn staff_input(dni: &str, email: &str, role_id: i64) -> NewStaffAccount {
        NewStaffAccount {
            dni: dni.to_string(),
            name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            email: email.to_string(),
            phone: "555-0101".to_string(),
            company: None,
            role_id,
        }
    }

    fn client_input(dni: &str, email: &str) -> NewClientAccount {
        NewClientAccount {
            dni: dni.to_string(),
            name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            email: email.to_string(),
            phone: "555-0101".to_string(),
            company: Some("Acme".to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_session() {
        let fx = fixture();
        let account = seed(&fx, "a@b.com", "Secret123", true);

        let session = fx.gateway.login("a@b.com", "Secret123").await.unwrap();
        let claims = fx.codec.verify(&session.access_token).unwrap();

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, Some(1));
        assert_eq!(session.user.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_login_check_order() {
        let fx = fixture();
        seed(&fx, "blocked@b.com", "Secret123", false);

        // Unknown account wins over everything
        assert_eq!(
            fx.gateway.login("nobody@b.com", "whatever").await.unwrap_err(),
            AuthError::AccountNotFound
        );
        // Inactive is reported before the password is even compared
        assert_eq!(
            fx.gateway.login("blocked@b.com", "wrong").await.unwrap_err(),
            AuthError::AccountInactive
        );

        seed(&fx, "live@b.com", "Secret123", true);
        assert_eq!(
            fx.gateway.login("live@b.com", "wrong").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn test_forget_password_mails_valid_reset_token() {
        let fx = fixture();
        let account = seed(&fx, "a@b.com", "Secret123", true);

        fx.gateway.forget_password("a@b.com").await.unwrap();

        let sent = fx.mailer.sent();
        let Some(Sent::Reset {
            to,
            display_name,
            token,
        }) = sent.first()
        else {
            panic!("expected a reset mail, got {sent:?}");
        };
        assert_eq!(to, "a@b.com");
        // Display name is the address itself
        assert_eq!(display_name, "a@b.com");

        let claims = fx.codec.verify(token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.role, None);
    }

    #[tokio::test]
    async fn test_forget_password_failures() {
        let fx = fixture();
        seed(&fx, "blocked@b.com", "Secret123", false);

        assert_eq!(
            fx.gateway.forget_password("nobody@b.com").await.unwrap_err(),
            AuthError::AccountNotFound
        );
        assert_eq!(
            fx.gateway.forget_password("blocked@b.com").await.unwrap_err(),
            AuthError::AccountInactive
        );

        let failing = fixture_with_mailer(RecordingMailer::failing());
        seed(&failing, "a@b.com", "Secret123", true);
        assert_eq!(
            failing.gateway.forget_password("a@b.com").await.unwrap_err(),
            AuthError::MailDispatchFailed
        );
    }

    #[tokio::test]
    async fn test_reset_password_roundtrip() {
        let fx = fixture();
        seed(&fx, "a@b.com", "OldSecret1", true);

        fx.gateway.forget_password("a@b.com").await.unwrap();
        let Some(Sent::Reset { token, .. }) = fx.mailer.sent().into_iter().next() else {
            panic!("no reset mail");
        };

        fx.gateway.reset_password(&token, "NewSecret1").await.unwrap();

        assert!(fx.gateway.login("a@b.com", "NewSecret1").await.is_ok());
        assert_eq!(
            fx.gateway.login("a@b.com", "OldSecret1").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn test_reset_token_is_not_revoked_after_use() {
        // Stateless tokens: within the 5-minute window the same link can be
        // replayed. Documented behavior, not an accident.
        let fx = fixture();
        seed(&fx, "a@b.com", "OldSecret1", true);

        fx.gateway.forget_password("a@b.com").await.unwrap();
        let Some(Sent::Reset { token, .. }) = fx.mailer.sent().into_iter().next() else {
            panic!("no reset mail");
        };

        fx.gateway.reset_password(&token, "FirstNew1").await.unwrap();
        fx.gateway.reset_password(&token, "SecondNew1").await.unwrap();

        assert!(fx.gateway.login("a@b.com", "SecondNew1").await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_rejects_bad_tokens() {
        let fx = fixture();
        let account = seed(&fx, "a@b.com", "Secret123", true);

        assert_eq!(
            fx.gateway.reset_password("garbage", "NewSecret1").await.unwrap_err(),
            AuthError::InvalidOrExpiredToken
        );

        let expired = fx
            .codec
            .issue(account.id, &account.email, None, Duration::seconds(-10))
            .unwrap();
        assert_eq!(
            fx.gateway.reset_password(&expired, "NewSecret1").await.unwrap_err(),
            AuthError::InvalidOrExpiredToken
        );

        // Valid token for an account that no longer exists
        let orphan = fx.codec.issue_reset(9999, "ghost@b.com").unwrap();
        assert_eq!(
            fx.gateway.reset_password(&orphan, "NewSecret1").await.unwrap_err(),
            AuthError::AccountNotFound
        );
    }

    #[tokio::test]
    async fn test_reset_password_rejects_inactive_account() {
        let fx = fixture();
        let account = seed(&fx, "a@b.com", "Secret123", false);

        let token = fx.codec.issue_reset(account.id, &account.email).unwrap();
        assert_eq!(
            fx.gateway.reset_password(&token, "NewSecret1").await.unwrap_err(),
            AuthError::AccountInactive
        );
    }

    #[tokio::test]
    async fn test_change_password() {
        let fx = fixture();
        let account = seed(&fx, "a@b.com", "OldSecret1", true);

        let hash_before = fx.directory.password_hash_of(account.id).unwrap();
        assert_eq!(
            fx.gateway
                .change_password(account.id, "wrong", "NewSecret1")
                .await
                .unwrap_err(),
            AuthError::CurrentPasswordMismatch
        );
        // A rejected change leaves the stored hash untouched
        assert_eq!(fx.directory.password_hash_of(account.id).unwrap(), hash_before);

        fx.gateway
            .change_password(account.id, "OldSecret1", "NewSecret1")
            .await
            .unwrap();
        assert!(fx.gateway.login("a@b.com", "NewSecret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_account_initial_password_is_dni() {
        let fx = fixture();

        let summary = fx
            .gateway
            .create_account(staff_input("12345678", "staff@b.com", 3))
            .await
            .unwrap();

        assert_eq!(summary.role, "SELLER");

        let session = fx.gateway.login("staff@b.com", "12345678").await.unwrap();
        assert_eq!(session.user.dni, "12345678");
    }

    #[tokio::test]
    async fn test_create_account_rejects_missing_or_inactive_role() {
        let fx = fixture();
        fx.directory.add_role(9, "AUDIT", false);

        assert_eq!(
            fx.gateway
                .create_account(staff_input("1", "a@b.com", 42))
                .await
                .unwrap_err(),
            AuthError::RoleNotFound
        );
        assert_eq!(
            fx.gateway
                .create_account(staff_input("1", "a@b.com", 9))
                .await
                .unwrap_err(),
            AuthError::RoleNotFound
        );
    }

    #[tokio::test]
    async fn test_create_account_duplicate_precheck() {
        let fx = fixture();
        fx.gateway
            .create_account(staff_input("111", "first@b.com", 1))
            .await
            .unwrap();

        assert_eq!(
            fx.gateway
                .create_account(staff_input("111", "other@b.com", 1))
                .await
                .unwrap_err(),
            AuthError::DuplicateAccount(DuplicateField::Dni)
        );
        assert_eq!(
            fx.gateway
                .create_account(staff_input("222", "first@b.com", 1))
                .await
                .unwrap_err(),
            AuthError::DuplicateAccount(DuplicateField::Email)
        );
    }

    /// Directory whose pre-check lookups always miss, modeling the window
    /// where two concurrent creates both pass the fast path. The store's
    /// uniqueness check must still catch the loser.
    struct BlindDirectory(Arc<MemDirectory>);

    #[async_trait]
    impl AccountDirectory for BlindDirectory {
        async fn find_by_email(&self, _: &str) -> Result<Option<AccountWithRole>, StoreError> {
            Ok(None)
        }

        async fn find_by_dni(&self, _: &str) -> Result<Option<Account>, StoreError> {
            Ok(None)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<AccountWithRole>, StoreError> {
            AccountDirectory::find_by_id(&*self.0, id).await
        }

        async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
            self.0.create(account).await
        }

        async fn update(
            &self,
            id: i64,
            fields: AccountUpdate,
        ) -> Result<Option<Account>, StoreError> {
            self.0.update(id, fields).await
        }

        async fn list_by_role(
            &self,
            role_id: i64,
            active_only: bool,
        ) -> Result<Vec<AccountSummary>, StoreError> {
            self.0.list_by_role(role_id, active_only).await
        }

        async fn list_filtered(
            &self,
            filter: AccountFilter,
        ) -> Result<Page<AccountSummary>, StoreError> {
            self.0.list_filtered(filter).await
        }
    }

    #[tokio::test]
    async fn test_duplicate_caught_by_store_when_precheck_misses() {
        let directory = Arc::new(MemDirectory::new());
        let gateway = AuthGateway::new(
            Arc::new(BlindDirectory(directory.clone())),
            directory,
            Arc::new(TokenCodec::new(
                "test-secret-key-at-least-32-bytes-long",
                Duration::hours(24),
            )),
            Arc::new(RecordingMailer::new()),
        );

        gateway
            .create_account(staff_input("111", "a@b.com", 1))
            .await
            .unwrap();

        assert_eq!(
            gateway
                .create_account(staff_input("222", "a@b.com", 1))
                .await
                .unwrap_err(),
            AuthError::DuplicateAccount(DuplicateField::Email)
        );
    }

    #[tokio::test]
    async fn test_create_client_account_mails_working_credential() {
        let fx = fixture();

        let summary = fx
            .gateway
            .create_client_account(client_input("999", "client@b.com"))
            .await
            .unwrap();

        assert_eq!(summary.role, "CLIENT");
        assert_eq!(summary.complete_name, "Acme");

        let Some(Sent::Welcome { to, credential }) = fx.mailer.sent().into_iter().next() else {
            panic!("no welcome mail");
        };
        assert_eq!(to, "client@b.com");
        assert_eq!(credential.len(), GENERATED_CREDENTIAL_LEN);

        assert!(fx.gateway.login("client@b.com", &credential).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_client_account_survives_mail_failure() {
        let fx = fixture_with_mailer(RecordingMailer::failing());

        let summary = fx
            .gateway
            .create_client_account(client_input("999", "client@b.com"))
            .await
            .unwrap();

        assert_eq!(summary.email, "client@b.com");
    }

    #[tokio::test]
    async fn test_change_role_and_deactivate() {
        let fx = fixture();
        let account = seed(&fx, "a@b.com", "Secret123", true);

        let summary = fx.gateway.change_role(account.id, 3).await.unwrap();
        assert_eq!(summary.role, "SELLER");

        assert_eq!(
            fx.gateway.change_role(account.id, 42).await.unwrap_err(),
            AuthError::RoleNotFound
        );
        assert_eq!(
            fx.gateway.change_role(9999, 3).await.unwrap_err(),
            AuthError::AccountNotFound
        );

        fx.gateway.deactivate(account.id).await.unwrap();
        assert_eq!(
            fx.gateway.login("a@b.com", "Secret123").await.unwrap_err(),
            AuthError::AccountInactive
        );
        assert_eq!(
            fx.gateway.deactivate(9999).await.unwrap_err(),
            AuthError::AccountNotFound
        );
    }
}
