pub mod resend;

use crate::config::Settings;

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    fn recipient(&self) -> &str;

    async fn send_html(&self, subject: &str, html: &str) -> anyhow::Result<()>;
}

pub fn subject_for(date: &str) -> String {
    format!("📈 오늘의 AI 투자 분석 - {date}")
}

/// Sends the rendered report. A missing mailer is the supported dry-run mode.
pub struct Dispatcher {
    mailer: Option<Box<dyn Mailer>>,
    missing: Vec<&'static str>,
}

impl Dispatcher {
    pub fn new(mailer: Option<Box<dyn Mailer>>) -> Self {
        Self {
            mailer,
            missing: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mailer = resend::ResendClient::from_settings(settings)?
            .map(|m| Box::new(m) as Box<dyn Mailer>);

        let mut missing = Vec::new();
        if settings.resend_api_key.is_none() {
            missing.push("RESEND_API_KEY");
        }
        if settings.email_to.is_none() {
            missing.push("EMAIL_TO");
        }

        Ok(Self { mailer, missing })
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    /// Why delivery is skipped, or `None` when a mailer is present.
    pub fn skip_reason(&self) -> Option<String> {
        if self.mailer.is_some() {
            return None;
        }
        Some(if self.missing.is_empty() {
            "no mailer configured".to_string()
        } else {
            format!("{} not set", self.missing.join(", "))
        })
    }

    pub async fn send_report(&self, html: &str, date: &str) -> bool {
        let Some(mailer) = self.mailer.as_ref() else {
            let reason = self.skip_reason().unwrap_or_default();
            tracing::warn!(%reason, "email not configured; skipping delivery");
            return false;
        };

        match mailer.send_html(&subject_for(date), html).await {
            Ok(()) => {
                tracing::info!(to = mailer.recipient(), "report email sent");
                true
            }
            Err(err) => {
                tracing::error!(
                    to = mailer.recipient(),
                    error = %format!("{err:#}"),
                    "report email failed"
                );
                false
            }
        }
    }
}
