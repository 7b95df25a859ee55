use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::Config;
use crate::error::{AppError, Result};

/// Async SMTP mailer. The only message it knows how to send is the signup
/// verification code.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::Configuration(format!("Invalid SMTP host: {}", e)))?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        let from = config
            .smtp_from
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid SMTP from address: {}", e)))?;

        Ok(Self { transport, from })
    }

    pub async fn send_verification_code(
        &self,
        to: &str,
        username: &str,
        code: i32,
    ) -> Result<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Your Moodify verification code")
            .body(format!(
                "Hi {},\n\nYour verification code is {}. It expires in 15 minutes.\n",
                username, code
            ))
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
