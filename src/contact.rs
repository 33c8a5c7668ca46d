use crate::{
    domain::{MailTransport, OutgoingMail},
    errors::ContactError,
    models::{ContactMessage, ContactSubject},
};
use std::sync::Arc;

/// Contact form fields after presence validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidContact<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

impl ContactMessage {
    /// All four fields must be present and non-empty.
    pub fn validate(&self) -> Result<ValidContact<'_>, ContactError> {
        fn field(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        match (
            field(&self.name),
            field(&self.email),
            field(&self.subject),
            field(&self.message),
        ) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(ValidContact {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(ContactError::MissingFields),
        }
    }
}

/// Renders the notification email. Field values are embedded as-is.
pub fn render_html(contact: &ValidContact<'_>) -> String {
    format!(
        "<h3>New message from your portfolio website</h3>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Subject:</strong> {}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n",
        contact.name,
        contact.email,
        contact.subject,
        contact.message.replace('\n', "<br>"),
    )
}

/// Forwards contact form submissions to a single inbox.
pub struct ContactRelay {
    transport: Arc<dyn MailTransport>,
    recipient: String,
}

impl ContactRelay {
    pub fn new(transport: Arc<dyn MailTransport>, recipient: impl Into<String>) -> Self {
        Self {
            transport,
            recipient: recipient.into(),
        }
    }

    pub async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        let contact = message.validate()?;

        if ContactSubject::parse(contact.subject).is_none() {
            tracing::debug!(subject = %contact.subject, "Contact subject is not one of the form options");
        }

        let mail = OutgoingMail {
            from_name: contact.name.to_string(),
            from_email: contact.email.to_string(),
            to: self.recipient.clone(),
            subject: format!("Portfolio Contact: {}", contact.subject),
            html_body: render_html(&contact),
        };

        tracing::info!(from = %mail.from_email, to = %mail.to, subject = %mail.subject, "Relaying contact message");
        self.transport.send(mail).await?;
        tracing::info!("Contact message sent successfully");
        Ok(())
    }
}
