use anyhow::{Context, anyhow};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use rand::Rng;
use tracing::instrument;

use codeoj_config::EmailConfig;

/// Delivers a freshly generated password-reset code to a mailbox.
#[async_trait]
pub trait ResetCodeSender: Send + Sync {
    /// Generates a code, sends it to `to_email` and returns it for storage.
    async fn send_code(&self, to_email: &str) -> anyhow::Result<String>;
}

/// Numeric code of `length` digits.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct SmtpCodeSender {
    config: EmailConfig,
}

impl SmtpCodeSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, to_email: &str, code: &str) -> anyhow::Result<Message> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(from.parse().map_err(|e| anyhow!("Invalid from email: {}", e))?)
            .to(to_email
                .parse()
                .map_err(|e| anyhow!("Invalid to email: {}", e))?)
            .subject(self.config.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(format!("Verify code is {}\r\n", code))
            .context("Failed to build email")
    }

    fn build_transport(&self) -> anyhow::Result<SmtpTransport> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .context("Failed to create SMTP relay")?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }
}

#[async_trait]
impl ResetCodeSender for SmtpCodeSender {
    #[instrument(skip_all)]
    async fn send_code(&self, to_email: &str) -> anyhow::Result<String> {
        let code = generate_code(self.config.verify_code_length);

        if !self.config.enabled {
            tracing::warn!("SMTP disabled, reset code generated but not sent");
            return Ok(code);
        }

        let email = self.build_message(to_email, &code)?;
        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .context("Task join error")?
            .context("Failed to send email")?;

        Ok(code)
    }
}
