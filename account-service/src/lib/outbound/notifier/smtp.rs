use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::EmailConfig;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::PasswordResetNotifier;
use crate::user::errors::NotifierError;

/// Password-reset delivery over SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, NotifierError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| NotifierError::Config(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from = config
            .from_address
            .parse()
            .map_err(|_| NotifierError::Config(format!("bad from address: {}", config.from_address)))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl PasswordResetNotifier for SmtpMailer {
    async fn send_reset(
        &self,
        recipient: &EmailAddress,
        reset_url: &str,
    ) -> Result<(), NotifierError> {
        let to: Mailbox = recipient
            .as_str()
            .parse()
            .map_err(|_| NotifierError::Address(recipient.as_str().to_string()))?;

        let body = format!(
            "Forgot your password? Submit a PATCH request with your new password \
             and passwordConfirm to: {reset_url}\n\
             If you didn't forget your password, please ignore this email."
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Your password reset token (valid for 10 min)")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifierError::Send(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| NotifierError::Send(e.to_string()))
    }
}
