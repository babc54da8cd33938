//! Mail transport: trait seam plus SMTP and no-op implementations.
//!
//! The HTTP layer only needs success or failure; the error variants exist so
//! logs can tell missing credentials, auth rejection, and transport trouble apart.

mod noop;
mod smtp;

use async_trait::async_trait;
use thiserror::Error;

pub use noop::NoopMailer;
pub use smtp::SmtpMailer;

/// Why a send failed. Collapsed to a boolean-style outcome at the request boundary.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail credentials not configured")]
    MissingCredentials,

    #[error("SMTP authentication failed: {0}")]
    Auth(String),

    #[error("mail transport error: {0}")]
    Transport(String),

    #[error("invalid mail message: {0}")]
    InvalidMessage(String),
}

/// Sends one HTML email. Implementations own their timeout and connection policy;
/// the caller does not retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}
