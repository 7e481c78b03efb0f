/// Outbound mail dispatch over SMTP
///
/// Two messages leave this system: the password-reset link and the welcome
/// mail carrying a freshly generated client credential. Both are built as
/// plaintext + HTML alternatives so any client renders something sane.
///
/// When SMTP is not configured (no host set) the dispatcher logs the intent
/// and reports success, so development environments work without a relay.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Error type for mail operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    /// Address parsing or message assembly failed
    #[error("failed to compose message: {0}")]
    Compose(String),

    /// The SMTP relay rejected the message or was unreachable
    #[error("smtp transport failure: {0}")]
    Transport(String),
}

/// Outbound mail seam
///
/// The gateway depends on this trait, never on a concrete transport, so flow
/// tests substitute a recording implementation.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Sends the password-reset link for `token` addressed to
    /// `display_name`; the caller treats failure as a hard error
    async fn send_reset_link(
        &self,
        to: &str,
        display_name: &str,
        token: &str,
    ) -> Result<(), MailError>;

    /// Sends the welcome mail with a generated initial credential
    async fn send_welcome(&self, to: &str, name: &str, credential: &str) -> Result<(), MailError>;
}

/// SMTP settings plus the frontend base URL reset links point at
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: String,
    pub from_name: String,
    pub frontend_url: String,
}

impl MailConfig {
    /// Whether a relay host is set; without one every send becomes a logged
    /// no-op
    pub fn is_configured(&self) -> bool {
        self.smtp_host.as_deref().is_some_and(|h| !h.is_empty())
    }
}

/// [`MailDispatcher`] backed by an SMTP relay
///
/// A transport is built per send; at this system's mail volume connection
/// reuse buys nothing and a stale pooled connection costs a reset mail.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn reset_url(&self, token: &str) -> String {
        format!(
            "{}/auth/reset-password?token={}",
            self.config.frontend_url.trim_end_matches('/'),
            token
        )
    }

    fn sender(&self) -> Result<Mailbox, MailError> {
        format!("{} <{}>", self.config.from_name, self.config.from_address)
            .parse()
            .map_err(|e| MailError::Compose(format!("invalid sender address: {e}")))
    }

    async fn send(
        &self,
        to: &str,
        display_name: &str,
        subject: &str,
        text_body: String,
        html_body: String,
    ) -> Result<(), MailError> {
        if !self.config.is_configured() {
            tracing::warn!(to, subject, "smtp not configured, skipping mail dispatch");
            return Ok(());
        }

        let recipient: Mailbox = format!("{display_name} <{to}>")
            .parse()
            .map_err(|e| MailError::Compose(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.sender()?)
            .to(recipient)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| MailError::Compose(e.to_string()))?;

        let host = self.config.smtp_host.as_deref().unwrap_or_default();
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        ) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        let transport = builder.build();
        transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

#[async_trait]
impl MailDispatcher for SmtpMailer {
    async fn send_reset_link(
        &self,
        to: &str,
        display_name: &str,
        token: &str,
    ) -> Result<(), MailError> {
        let url = self.reset_url(token);
        let text = format!(
            "Hello {display_name},\n\n\
             A password reset was requested for your account. Open the link \
             below within 5 minutes to choose a new password:\n\n{url}\n\n\
             If you did not request this, you can ignore this mail."
        );
        let html = format!(
            "<p>Hello {},</p>\
             <p>A password reset was requested for your account. Open the link \
             below within 5 minutes to choose a new password:</p>\
             <p><a href=\"{}\">Reset your password</a></p>\
             <p>If you did not request this, you can ignore this mail.</p>",
            html_escape(display_name),
            html_escape(&url),
        );

        self.send(to, display_name, "Reset your password", text, html)
            .await
    }

    async fn send_welcome(&self, to: &str, name: &str, credential: &str) -> Result<(), MailError> {
        let text = format!(
            "Hello {name},\n\n\
             Your account has been created. Sign in with:\n\n\
             Email: {to}\nPassword: {credential}\n\n\
             Please change this password after your first login."
        );
        let html = format!(
            "<p>Hello {},</p>\
             <p>Your account has been created. Sign in with:</p>\
             <p>Email: <b>{}</b><br>Password: <b>{}</b></p>\
             <p>Please change this password after your first login.</p>",
            html_escape(name),
            html_escape(to),
            html_escape(credential),
        );

        self.send(to, name, "Welcome", text, html).await
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
