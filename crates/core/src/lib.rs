pub mod analysis;
pub mod delivery;
pub mod domain;
pub mod llm;
pub mod news;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::analysis::AnalysisVariant;

    pub const DEFAULT_NEWS_QUERY: &str = "경제 증시 투자 주식";
    pub const DEFAULT_NEWS_COUNT: u32 = 10;
    pub const DEFAULT_NAVER_BASE_URL: &str = "https://openapi.naver.com";
    pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
    pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
    pub const DEFAULT_EMAIL_FROM: &str = "Investment Bot <onboarding@resend.dev>";
    pub const DEFAULT_OUTPUT_DIR: &str = "output";
    pub const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub naver_client_id: Option<String>,
        pub naver_client_secret: Option<String>,
        pub naver_base_url: String,
        pub news_query: String,
        pub news_count: u32,

        pub gemini_api_key: Option<String>,
        pub gemini_base_url: String,
        pub gemini_model: String,
        pub analysis_variant: AnalysisVariant,

        pub resend_api_key: Option<String>,
        pub resend_base_url: String,
        pub email_to: Option<String>,
        pub email_from: String,

        pub output_dir: PathBuf,
        pub http_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
        /// Dashboard API listen port.
        pub port: u16,
    }

    impl Default for Settings {
        /// Fully offline configuration: every credential absent.
        fn default() -> Self {
            Self {
                naver_client_id: None,
                naver_client_secret: None,
                naver_base_url: DEFAULT_NAVER_BASE_URL.to_string(),
                news_query: DEFAULT_NEWS_QUERY.to_string(),
                news_count: DEFAULT_NEWS_COUNT,
                gemini_api_key: None,
                gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
                analysis_variant: AnalysisVariant::Simple,
                resend_api_key: None,
                resend_base_url: DEFAULT_RESEND_BASE_URL.to_string(),
                email_to: None,
                email_from: DEFAULT_EMAIL_FROM.to_string(),
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
                http_timeout_secs: None,
                sentry_dsn: None,
                port: DEFAULT_PORT,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup. Empty values count as unset.
        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let get = |key: &str| {
                lookup(key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            };
            let defaults = Self::default();

            let news_count = match get("NEWS_COUNT") {
                Some(s) => s
                    .parse::<u32>()
                    .with_context(|| format!("NEWS_COUNT must be a positive integer (got {s})"))?,
                None => defaults.news_count,
            };
            anyhow::ensure!(
                (1..=100).contains(&news_count),
                "NEWS_COUNT must be 1..=100 (got {news_count})"
            );

            let analysis_variant = match get("ANALYSIS_VARIANT") {
                Some(s) => s.parse::<AnalysisVariant>()?,
                None => defaults.analysis_variant,
            };

            let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
                Some(s) => Some(s.parse::<u64>().with_context(|| {
                    format!("HTTP_TIMEOUT_SECS must be an integer (got {s})")
                })?),
                None => None,
            };

            let port = match get("PORT") {
                Some(s) => s
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a port number (got {s})"))?,
                None => defaults.port,
            };

            Ok(Self {
                naver_client_id: get("NAVER_CLIENT_ID"),
                naver_client_secret: get("NAVER_CLIENT_SECRET"),
                naver_base_url: get("NAVER_BASE_URL").unwrap_or(defaults.naver_base_url),
                news_query: get("NEWS_QUERY").unwrap_or(defaults.news_query),
                news_count,
                gemini_api_key: get("GEMINI_API_KEY"),
                gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
                gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
                analysis_variant,
                resend_api_key: get("RESEND_API_KEY"),
                resend_base_url: get("RESEND_BASE_URL").unwrap_or(defaults.resend_base_url),
                email_to: get("EMAIL_TO"),
                email_from: get("EMAIL_FROM").unwrap_or(defaults.email_from),
                output_dir: get("OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output_dir),
                http_timeout_secs,
                sentry_dsn: get("SENTRY_DSN"),
                port,
            })
        }

        /// Both halves of the Naver credential pair, if present.
        pub fn naver_credentials(&self) -> Option<(&str, &str)> {
            Some((
                self.naver_client_id.as_deref()?,
                self.naver_client_secret.as_deref()?,
            ))
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }

        pub fn require_resend_api_key(&self) -> anyhow::Result<&str> {
            self.resend_api_key
                .as_deref()
                .context("RESEND_API_KEY is required")
        }

        pub fn require_email_to(&self) -> anyhow::Result<&str> {
            self.email_to.as_deref().context("EMAIL_TO is required")
        }

        /// Shared reqwest client. No timeout unless `HTTP_TIMEOUT_SECS` is set.
        pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
            let mut builder = reqwest::Client::builder();
            if let Some(secs) = self.http_timeout_secs {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            builder.build().context("failed to build reqwest client")
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |key| map.get(key).cloned()
        }

        #[test]
        fn empty_environment_is_fully_offline() {
            let settings = Settings::from_lookup(lookup(&[])).unwrap();
            assert!(settings.naver_credentials().is_none());
            assert!(settings.gemini_api_key.is_none());
            assert!(settings.resend_api_key.is_none());
            assert_eq!(settings.news_query, DEFAULT_NEWS_QUERY);
            assert_eq!(settings.news_count, 10);
            assert_eq!(settings.analysis_variant, AnalysisVariant::Simple);
            assert_eq!(settings.output_dir, PathBuf::from("output"));
            assert_eq!(settings.port, 3000);
        }

        #[test]
        fn blank_values_count_as_unset() {
            let settings = Settings::from_lookup(lookup(&[
                ("GEMINI_API_KEY", "   "),
                ("NAVER_CLIENT_ID", "id"),
                ("NAVER_CLIENT_SECRET", ""),
            ]))
            .unwrap();
            assert!(settings.gemini_api_key.is_none());
            // Half a credential pair is no credential.
            assert!(settings.naver_credentials().is_none());
        }

        #[test]
        fn reads_variant_and_overrides() {
            let settings = Settings::from_lookup(lookup(&[
                ("ANALYSIS_VARIANT", "advanced"),
                ("NEWS_COUNT", "20"),
                ("HTTP_TIMEOUT_SECS", "15"),
                ("OUTPUT_DIR", "/tmp/briefing"),
            ]))
            .unwrap();
            assert_eq!(settings.analysis_variant, AnalysisVariant::Advanced);
            assert_eq!(settings.news_count, 20);
            assert_eq!(settings.http_timeout_secs, Some(15));
            assert_eq!(settings.output_dir, PathBuf::from("/tmp/briefing"));
        }

        #[test]
        fn rejects_garbage_numbers() {
            assert!(Settings::from_lookup(lookup(&[("NEWS_COUNT", "many")])).is_err());
            assert!(Settings::from_lookup(lookup(&[("NEWS_COUNT", "0")])).is_err());
            assert!(Settings::from_lookup(lookup(&[("ANALYSIS_VARIANT", "turbo")])).is_err());
            assert!(Settings::from_lookup(lookup(&[("PORT", "70000")])).is_err());
        }

        #[test]
        fn reads_listen_port() {
            let settings = Settings::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
            assert_eq!(settings.port, 8080);
        }
    }
}
