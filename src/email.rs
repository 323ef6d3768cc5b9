use std::future::Future;

use color_eyre::Result;
use serde::Serialize;

use crate::services::auth::EmailSender;

#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// Magic-link delivery via the Resend API. Without an API key the sender is
/// disabled and the auth service logs the link instead (development mode).
#[derive(Clone)]
pub struct ResendEmailSender {
    api_key: Option<String>,
    from: String,
}

impl ResendEmailSender {
    pub fn new(api_key: Option<String>, from: String) -> Self {
        Self { api_key, from }
    }

    async fn send(&self, to_email: &str, magic_url: &str, expiry_minutes: i64) -> Result<()> {
        let Some(api_key) = &self.api_key else {
            color_eyre::eyre::bail!("email sending is not configured");
        };

        let body = SendEmailRequest {
            from: self.from.clone(),
            to: vec![to_email.to_string()],
            subject: "Your login link".to_string(),
            html: format!(
                r#"<h2>Hello!</h2>
<p>Click the link below to log in:</p>
<p><a href="{magic_url}">{magic_url}</a></p>
<p>This link expires in {expiry_minutes} minutes and can be used once.</p>
<p>If you did not request this link, you can safely ignore this email.</p>"#
            ),
        };

        let client = reqwest::Client::new();
        let resp = client
            .post("https://api.resend.com/emails")
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Resend API error: {status} - {text}");
            color_eyre::eyre::bail!("Resend API returned {status}");
        }

        tracing::info!("magic link email sent to {to_email}");
        Ok(())
    }
}

impl EmailSender for ResendEmailSender {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn send_magic_link(
        &self,
        to_email: &str,
        magic_url: &str,
        expiry_minutes: i64,
    ) -> impl Future<Output = Result<()>> + Send {
        self.send(to_email, magic_url, expiry_minutes)
    }
}
