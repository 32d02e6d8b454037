use async_trait::async_trait;
use tracing::info;

/// A rendered outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl Email {
    pub fn password_reset(from: &str, to: &str, reset_link: &str) -> Self {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">Password Reset Request</h2>
  <p>You have requested to reset your password. Click the button below to reset your password:</p>
  <div style="text-align: center; margin: 30px 0;">
    <a href="{reset_link}" style="background-color: #007bff; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; display: inline-block;">Reset Password</a>
  </div>
  <p style="color: #666; font-size: 14px;">If the button doesn't work, copy and paste this link into your browser:<br><a href="{reset_link}">{reset_link}</a></p>
  <p style="color: #666; font-size: 14px;">This link will expire in 1 hour. If you didn't request this password reset, please ignore this email.</p>
</div>"#
        );
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: "Password Reset Request".to_string(),
            html,
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

/// Writes outgoing mail to the log. Stands in until an SMTP transport is wired.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            bytes = email.html.len(),
            "outbound email"
        );
        Ok(())
    }
}
