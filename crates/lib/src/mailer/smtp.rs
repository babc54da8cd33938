//! SMTP transport over lettre's async STARTTLS relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{self, Config};

use super::{MailError, MailTransport};

/// Real SMTP sender. Credentials are resolved at construction but a missing
/// pair is a send-time failure, so the server can boot without them and report
/// the problem per request, matching the HTTP contract.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    /// Build from config plus SMTP_USERNAME / SMTP_PASSWORD env overrides.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let username = config::resolve_smtp_username(config);
        let password = config::resolve_smtp_password(config);
        let (transport, from) = match (username, password) {
            (Some(user), Some(pass)) => {
                let from = config
                    .mail
                    .from_address
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| user.clone());
                let transport =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.mail.smtp_host)
                        .map_err(|e| MailError::Transport(e.to_string()))?
                        .port(config.mail.smtp_port)
                        .credentials(Credentials::new(user, pass))
                        .build();
                (Some(transport), from)
            }
            _ => {
                log::warn!("SMTP credentials not configured; sends will fail until they are set");
                (None, String::new())
            }
        };
        Ok(Self { transport, from })
    }
}

/// Auth rejections (535, "authentication") are split out so logs distinguish a
/// bad app password from relay trouble.
fn classify_smtp_error(e: lettre::transport::smtp::Error) -> MailError {
    let text = e.to_string();
    let is_auth = text.to_lowercase().contains("authentication")
        || text
            .split(|c: char| !c.is_ascii_digit())
            .any(|segment| segment == "535");
    if is_auth {
        MailError::Auth(text)
    } else {
        MailError::Transport(text)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            return Err(MailError::MissingCredentials);
        };
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| MailError::InvalidMessage(format!("from address: {}", e)))?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| MailError::InvalidMessage(format!("to address: {}", e)))?;
        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::InvalidMessage(e.to_string()))?;

        match transport.send(message).await {
            Ok(_) => {
                log::info!("sent email to {}: {}", to, subject);
                Ok(())
            }
            Err(e) => Err(classify_smtp_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn send_without_credentials_fails_cleanly() {
        let mailer = SmtpMailer::from_config(&Config::default()).unwrap();
        let result = mailer.send("a@b.co", "subject", "<p>hi</p>").await;
        assert!(matches!(result, Err(MailError::MissingCredentials)));
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected_before_any_network() {
        let mut config = Config::default();
        config.mail.username = Some("bridge@example.com".to_string());
        config.mail.password = Some("app-password".to_string());
        let mailer = SmtpMailer::from_config(&config).unwrap();
        let result = mailer.send("not-an-address", "subject", "<p>hi</p>").await;
        assert!(matches!(result, Err(MailError::InvalidMessage(_))));
    }

    #[test]
    fn from_address_overrides_username() {
        let mut config = Config::default();
        config.mail.username = Some("login@example.com".to_string());
        config.mail.password = Some("pass".to_string());
        config.mail.from_address = Some("noreply@example.com".to_string());
        let mailer = SmtpMailer::from_config(&config).unwrap();
        assert_eq!(mailer.from, "noreply@example.com");
    }
}
