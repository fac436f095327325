use crate::config::Settings;
use crate::delivery::Mailer;
use anyhow::Context;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    from: String,
    to: String,
}

impl ResendClient {
    /// `None` unless both `RESEND_API_KEY` and `EMAIL_TO` are configured.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        let (Ok(api_key), Ok(to)) = (settings.require_resend_api_key(), settings.require_email_to())
        else {
            return Ok(None);
        };

        Ok(Some(Self {
            http: settings.http_client()?,
            api_key: api_key.to_string(),
            base_url: settings.resend_base_url.clone(),
            from: settings.email_from.clone(),
            to: to.to_string(),
        }))
    }

    fn url(&self) -> String {
        format!("{}/emails", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait::async_trait]
impl Mailer for ResendClient {
    fn recipient(&self) -> &str {
        &self.to
    }

    async fn send_html(&self, subject: &str, html: &str) -> anyhow::Result<()> {
        let req = SendEmailRequest {
            from: &self.from,
            to: [&self.to],
            subject,
            html,
        };

        let res = self
            .http
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("Resend request failed")?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .context("failed to read Resend error body")?;
            anyhow::bail!("Resend HTTP {status}: {body}");
        }

        Ok(())
    }
}
