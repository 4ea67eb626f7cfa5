// Email Alert Channel - Using lettre

use crate::Result;
use crate::monitor::alerts::{AlertChannel, split_recipients};
use crate::monitor::config::MailConfig;
use async_trait::async_trait;
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

const SUBJECT: &str = "cert-checker alert";

/// Email alert channel
pub struct EmailChannel {
    config: MailConfig,
}

impl EmailChannel {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build a plaintext message from the relay account to every recipient
    fn build_message(&self, recipients: &[String], body: &str) -> Result<Message> {
        let mut message_builder = Message::builder()
            .from(self.config.username.parse()?)
            .subject(SUBJECT)
            .header(header::ContentType::TEXT_PLAIN);

        for to_addr in recipients {
            message_builder = message_builder.to(to_addr.parse()?);
        }

        Ok(message_builder.body(format_text_body(body))?)
    }

    /// Get SMTP transport
    fn get_transport(&self) -> Result<SmtpTransport> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let transport = SmtpTransport::starttls_relay(&self.config.relay_host)?
            .credentials(creds)
            .port(self.config.relay_port)
            .build();

        Ok(transport)
    }
}

/// Body text; the message is sent as-is with a single trailing newline
fn format_text_body(message: &str) -> String {
    let mut body = message.trim_end_matches('\n').to_string();
    body.push('\n');
    body
}

#[async_trait]
impl AlertChannel for EmailChannel {
    async fn send(&self, target: &str, message: &str) -> Result<()> {
        let recipients = split_recipients(target);
        let message = self.build_message(&recipients, message)?;
        let transport = self.get_transport()?;

        tracing::debug!(
            "Sending alert via {}:{} to {}",
            self.config.relay_host,
            self.config.relay_port,
            recipients.join(",")
        );

        // Send email (blocking operation, run in blocking task)
        tokio::task::spawn_blocking(move || transport.send(&message)).await??;

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckerError;

    fn create_test_config() -> MailConfig {
        MailConfig {
            relay_host: "smtp.example.com".to_string(),
            relay_port: 587,
            username: "alerts@example.com".to_string(),
            password: "pass".to_string(),
        }
    }

    #[test]
    fn test_channel_name() {
        let channel = EmailChannel::new(create_test_config());
        assert_eq!(channel.channel_name(), "email");
    }

    #[test]
    fn test_format_text_body() {
        assert_eq!(format_text_body("expired\n\n"), "expired\n");
        assert_eq!(format_text_body("will expire soon"), "will expire soon\n");
    }

    #[test]
    fn test_build_message_with_multiple_recipients() {
        let channel = EmailChannel::new(create_test_config());
        let recipients = split_recipients("ops@example.com,admin@example.com");

        let message = channel
            .build_message(&recipients, "certificate timestamp: soon")
            .unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 2);
        assert_eq!(
            envelope.from().map(|a| a.to_string()).as_deref(),
            Some("alerts@example.com")
        );

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: cert-checker alert"));
        assert!(formatted.contains("certificate timestamp: soon"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let mut config = create_test_config();
        config.username = String::new();
        let channel = EmailChannel::new(config);

        let err = channel
            .build_message(&["ops@example.com".to_string()], "body")
            .unwrap_err();
        assert!(matches!(err, CheckerError::Delivery { .. }));
    }

    #[test]
    fn test_get_transport() {
        let channel = EmailChannel::new(create_test_config());
        assert!(channel.get_transport().is_ok());
    }
}
