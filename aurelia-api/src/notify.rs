use async_trait::async_trait;
use tracing::info;

/// Outbound email seam. The storefront only ever sends three mails; a real
/// delivery service (SMTP, SES, ...) would implement this same trait.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(
        &self,
        to: &str,
        token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn send_order_confirmation(
        &self,
        to: &str,
        order_number: &str,
        total_cents: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Logs mails instead of sending them; the development/test delivery path.
pub struct ConsoleMailer {
    base_url: String,
}

impl ConsoleMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send_verification(
        &self,
        to: &str,
        token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            target: "mail",
            to = %to,
            link = %format!("{}/verify-email?token={}", self.base_url, token),
            "verification email"
        );
        Ok(())
    }

    async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            target: "mail",
            to = %to,
            link = %format!("{}/reset-password?token={}", self.base_url, token),
            "password reset email"
        );
        Ok(())
    }

    async fn send_order_confirmation(
        &self,
        to: &str,
        order_number: &str,
        total_cents: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            target: "mail",
            to = %to,
            order_number = %order_number,
            total_cents,
            "order confirmation email"
        );
        Ok(())
    }
}
