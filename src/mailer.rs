use crate::{
    config::MailConfig,
    domain::{MailTransport, OutgoingMail},
    errors::MailError,
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// SMTP relay backed by lettre's async tokio transport.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(credentials)
            .build();
        tracing::info!(smtp_host = %config.smtp_host, "Initializing SMTP mail transport");
        Ok(Self {
            transport,
            host: config.smtp_host.clone(),
        })
    }

    /// Checks that the relay accepts our connection. Only logs the result.
    pub async fn verify(&self) {
        match self.transport.test_connection().await {
            Ok(true) => tracing::info!(smtp_host = %self.host, "Server is ready to send emails"),
            Ok(false) => tracing::warn!(smtp_host = %self.host, "SMTP relay refused the test connection"),
            Err(e) => tracing::error!(smtp_host = %self.host, error = %e, "SMTP transport verification failed"),
        }
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress(format!("{}: {}", raw, e)))
}

pub(crate) fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let from = Mailbox::new(Some(mail.from_name.clone()), parse_address(&mail.from_email)?);
    let to = Mailbox::new(None, parse_address(&mail.to)?);

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = build_message(&mail)?;
        tracing::debug!(to = %mail.to, subject = %mail.subject, "SMTP: Sending message");

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::debug!(to = %mail.to, "SMTP: Message accepted by relay");
        Ok(())
    }
}
