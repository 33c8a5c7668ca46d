use crate::errors::{MailError, MediaError};
use crate::models::RawMedia;
use async_trait::async_trait;
use std::time::Instant;

/// Trait defining access to the upstream media listing.
#[async_trait]
pub trait MediaSource: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Fetches up to `limit` raw media objects for the account owning `access_token`.
    async fn fetch_media(&self, access_token: &str, limit: u32) -> Result<Vec<RawMedia>, MediaError>;
}

/// A fully addressed email ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from_email: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Trait defining the outbound mail channel used by the contact relay.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Sends a single message. No retries.
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Monotonic time source for the media cache.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
