//! No-op transport: logs and succeeds without sending.

use async_trait::async_trait;

use super::{MailError, MailTransport};

/// Log-only mail transport for tests and credential-less dev runs.
#[derive(Debug, Clone, Default)]
pub struct NoopMailer;

#[async_trait]
impl MailTransport for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), MailError> {
        log::info!("noop mail transport: skipping send to {} ({})", to, subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_send_succeeds() {
        let mailer = NoopMailer;
        let result = mailer
            .send("test@example.com", "subject", "<p>body</p>")
            .await;
        assert!(result.is_ok());
    }
}
