pub mod prompts;

use crate::config::Settings;
use crate::domain::defaults;
use crate::domain::{NewsItem, SectorOrTheme, StockRecommendation};
use crate::llm::gemini::GeminiClient;
use crate::llm::error::LlmError;
use crate::llm::json::decode_array;
use crate::llm::LlmClient;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// How much the prompts ask of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisVariant {
    /// Three themes, three stocks, base schema.
    #[default]
    Simple,
    /// Four themes, four stocks, beneficiary/risk fields, small/mid-cap bias.
    Advanced,
}

impl AnalysisVariant {
    pub fn pick_count(self) -> usize {
        match self {
            Self::Simple => 3,
            Self::Advanced => 4,
        }
    }
}

impl FromStr for AnalysisVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "advanced" => Ok(Self::Advanced),
            other => anyhow::bail!("unknown analysis variant {other:?} (expected simple|advanced)"),
        }
    }
}

impl fmt::Display for AnalysisVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Advanced => "advanced",
        })
    }
}

/// Prompt/parse/fallback cycles over an optional [`LlmClient`].
///
/// Every operation tolerates a missing client, a transport error, and
/// malformed output by returning the built-in default for that step.
pub struct Analyzer {
    llm: Option<Box<dyn LlmClient>>,
    variant: AnalysisVariant,
}

impl Analyzer {
    pub fn new(llm: Option<Box<dyn LlmClient>>, variant: AnalysisVariant) -> Self {
        Self { llm, variant }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let llm = GeminiClient::from_settings(settings)?.map(|c| Box::new(c) as Box<dyn LlmClient>);
        Ok(Self::new(llm, settings.analysis_variant))
    }

    pub fn is_ai_powered(&self) -> bool {
        self.llm.is_some()
    }

    pub fn variant(&self) -> AnalysisVariant {
        self.variant
    }

    pub async fn call_llm(&self, prompt: &str) -> Option<String> {
        let Some(llm) = self.llm.as_ref() else {
            tracing::warn!("GEMINI_API_KEY not set; skipping model call");
            return None;
        };

        match llm.generate_text(prompt).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                tracing::warn!(provider = ?llm.provider(), "model reply had no text");
                None
            }
            Err(err) => {
                let transient = err
                    .downcast_ref::<LlmError>()
                    .is_some_and(LlmError::is_transient);
                tracing::error!(
                    provider = ?llm.provider(),
                    transient,
                    error = %format!("{err:#}"),
                    "model call failed"
                );
                None
            }
        }
    }

    pub async fn analyze_themes(&self, news: &[NewsItem]) -> Vec<SectorOrTheme> {
        let prompt = prompts::themes_prompt(news, self.variant);
        self.decode_or_default("themes", &prompt, defaults::default_themes)
            .await
    }

    pub async fn recommend_stocks(
        &self,
        themes: &[SectorOrTheme],
        news: &[NewsItem],
    ) -> Vec<StockRecommendation> {
        let prompt = prompts::stocks_prompt(themes, news, self.variant);
        self.decode_or_default("stocks", &prompt, defaults::default_stocks)
            .await
    }

    pub async fn summarize_insight(
        &self,
        themes: &[SectorOrTheme],
        stocks: &[StockRecommendation],
    ) -> String {
        let prompt = prompts::insight_prompt(themes, stocks);
        match self.call_llm(&prompt).await {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => defaults::DEFAULT_INSIGHT.to_string(),
        }
    }

    async fn decode_or_default<T: DeserializeOwned>(
        &self,
        stage: &'static str,
        prompt: &str,
        fallback: fn() -> Vec<T>,
    ) -> Vec<T> {
        let Some(reply) = self.call_llm(prompt).await else {
            tracing::warn!(stage, "no model reply; using built-in defaults");
            return fallback();
        };

        match decode_array::<T>(&reply) {
            Ok(items) => {
                tracing::info!(stage, count = items.len(), "decoded model reply");
                items
            }
            Err(err) => {
                tracing::warn!(
                    stage,
                    error = %err,
                    reply_len = reply.len(),
                    "model reply malformed; using built-in defaults"
                );
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Outlook;
    use crate::llm::Provider;
    use serde_json::json;

    struct CannedLlm(Result<Option<String>, String>);

    #[async_trait::async_trait]
    impl LlmClient for CannedLlm {
        fn provider(&self) -> Provider {
            Provider::Gemini
        }

        async fn generate_text(&self, _prompt: &str) -> anyhow::Result<Option<String>> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn analyzer_replying(reply: Result<Option<&str>, &str>) -> Analyzer {
        let canned = reply
            .map(|o| o.map(str::to_string))
            .map_err(str::to_string);
        Analyzer::new(Some(Box::new(CannedLlm(canned))), AnalysisVariant::Simple)
    }

    fn news() -> Vec<NewsItem> {
        defaults::sample_news("2026년 10월 19일 월요일")
    }

    #[test]
    fn parses_variant_names() {
        assert_eq!("Advanced".parse::<AnalysisVariant>().unwrap(), AnalysisVariant::Advanced);
        assert_eq!(" simple ".parse::<AnalysisVariant>().unwrap(), AnalysisVariant::Simple);
        assert!("pro".parse::<AnalysisVariant>().is_err());
        assert_eq!(AnalysisVariant::Advanced.pick_count(), 4);
    }

    #[tokio::test]
    async fn no_client_falls_back_everywhere() {
        let analyzer = Analyzer::new(None, AnalysisVariant::Simple);
        assert!(!analyzer.is_ai_powered());
        assert!(analyzer.call_llm("hi").await.is_none());

        let themes = analyzer.analyze_themes(&news()).await;
        assert_eq!(themes, defaults::default_themes());

        let stocks = analyzer.recommend_stocks(&themes, &news()).await;
        assert_eq!(stocks, defaults::default_stocks());

        let insight = analyzer.summarize_insight(&themes, &stocks).await;
        assert_eq!(insight, defaults::DEFAULT_INSIGHT);
    }

    #[tokio::test]
    async fn well_formed_reply_is_returned_unmodified() {
        let expected = json!([
            {"name": "조선", "outlook": "bullish", "reason": "수주 호조", "keywords": ["LNG"]},
            {"name": "건설", "outlook": "bearish", "reason": "PF 부담", "keywords": []},
            {"name": "유통", "outlook": "neutral", "reason": "소비 정체", "keywords": ["면세"]}
        ]);
        let reply = format!("분석 결과입니다.\n```json\n{expected}\n```");
        let analyzer = analyzer_replying(Ok(Some(reply.as_str())));

        let themes = analyzer.analyze_themes(&news()).await;
        let decoded: Vec<SectorOrTheme> = serde_json::from_value(expected).unwrap();
        assert_eq!(themes, decoded);
        assert_eq!(themes[1].outlook, Outlook::Bearish);
    }

    #[tokio::test]
    async fn well_formed_stock_reply_is_returned() {
        let mut stocks = defaults::default_stocks();
        stocks.truncate(1);
        stocks[0].name = "한화오션".to_string();
        stocks[0].why_now = Some("수주 발표 임박".to_string());
        let reply = serde_json::to_string(&stocks).unwrap();
        let analyzer = analyzer_replying(Ok(Some(reply.as_str())));

        let got = analyzer
            .recommend_stocks(&defaults::default_themes(), &news())
            .await;
        assert_eq!(got, stocks);
    }

    #[tokio::test]
    async fn malformed_replies_fall_back_without_panicking() {
        for reply in [
            "오늘은 시장이 불안정하여 추천이 어렵습니다.",
            r#"{"name": "조선"}"#,
            "[1, 2, 3]",
            "[{\"name\": \"잘린 응답\"",
        ] {
            let analyzer = analyzer_replying(Ok(Some(reply)));
            let themes = analyzer.analyze_themes(&news()).await;
            assert_eq!(themes, defaults::default_themes(), "reply: {reply}");
            let stocks = analyzer.recommend_stocks(&themes, &news()).await;
            assert_eq!(stocks, defaults::default_stocks(), "reply: {reply}");
        }
    }

    #[tokio::test]
    async fn empty_array_reply_is_kept() {
        let analyzer = analyzer_replying(Ok(Some("```json\n[]\n```")));
        assert!(analyzer.analyze_themes(&news()).await.is_empty());
        assert!(analyzer.recommend_stocks(&[], &news()).await.is_empty());
    }

    #[tokio::test]
    async fn transport_error_and_empty_reply_fall_back() {
        let analyzer = analyzer_replying(Err("HTTP 503"));
        assert_eq!(analyzer.analyze_themes(&news()).await, defaults::default_themes());
        assert_eq!(
            analyzer.summarize_insight(&[], &[]).await,
            defaults::DEFAULT_INSIGHT
        );

        let analyzer = analyzer_replying(Ok(None));
        assert_eq!(analyzer.analyze_themes(&news()).await, defaults::default_themes());
    }

    #[tokio::test]
    async fn insight_returns_trimmed_model_text() {
        let analyzer = analyzer_replying(Ok(Some("  반도체 비중 확대, 손절 라인 엄수.\n")));
        let insight = analyzer
            .summarize_insight(&defaults::default_themes(), &defaults::default_stocks())
            .await;
        assert_eq!(insight, "반도체 비중 확대, 손절 라인 엄수.");
    }
}
