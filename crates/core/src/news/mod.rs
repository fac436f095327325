pub mod naver;
pub mod types;

use crate::config::Settings;
use crate::domain::defaults;
use crate::domain::NewsItem;

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn search(&self, query: &str, count: u32) -> anyhow::Result<Vec<NewsItem>>;
}

/// Wraps an optional [`NewsSource`] and degrades to the sample feed on any failure.
pub struct NewsFetcher {
    source: Option<Box<dyn NewsSource>>,
    sample_date: String,
}

impl NewsFetcher {
    pub fn new(source: Option<Box<dyn NewsSource>>, sample_date: impl Into<String>) -> Self {
        Self {
            source,
            sample_date: sample_date.into(),
        }
    }

    pub fn from_settings(settings: &Settings, sample_date: impl Into<String>) -> anyhow::Result<Self> {
        let source = naver::NaverNewsClient::from_settings(settings)?
            .map(|c| Box::new(c) as Box<dyn NewsSource>);
        Ok(Self::new(source, sample_date))
    }

    pub fn is_live(&self) -> bool {
        self.source.is_some()
    }

    pub async fn fetch_news(&self, query: &str, count: u32) -> Vec<NewsItem> {
        let Some(source) = self.source.as_ref() else {
            tracing::warn!("NAVER_CLIENT_ID/NAVER_CLIENT_SECRET not set; using sample news");
            return defaults::sample_news(&self.sample_date);
        };

        match source.search(query, count).await {
            Ok(items) => {
                tracing::info!(
                    source = source.source_name(),
                    %query,
                    count = items.len(),
                    "fetched news"
                );
                items
            }
            Err(err) => {
                tracing::error!(
                    source = source.source_name(),
                    %query,
                    error = %format!("{err:#}"),
                    "news fetch failed; using sample news"
                );
                defaults::sample_news(&self.sample_date)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    #[async_trait::async_trait]
    impl NewsSource for FailingSource {
        fn source_name(&self) -> &'static str {
            "failing"
        }

        async fn search(&self, _query: &str, _count: u32) -> anyhow::Result<Vec<NewsItem>> {
            anyhow::bail!("connection reset")
        }
    }

    #[tokio::test]
    async fn missing_source_returns_sample_verbatim() {
        let fetcher = NewsFetcher::new(None, "2026년 10월 19일 월요일");
        let news = fetcher.fetch_news("경제 증시 투자 주식", 10).await;
        assert_eq!(news, defaults::sample_news("2026년 10월 19일 월요일"));
        assert_eq!(
            news[0].summary,
            "AI 반도체 수요 증가로 업황 회복이 본격화되고 있습니다."
        );
    }

    #[tokio::test]
    async fn failing_source_degrades_to_sample() {
        let fetcher = NewsFetcher::new(Some(Box::new(FailingSource)), "d");
        let news = fetcher.fetch_news("q", 5).await;
        assert_eq!(news, defaults::sample_news("d"));
    }
}
