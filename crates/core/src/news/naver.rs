use crate::config::Settings;
use crate::domain::NewsItem;
use crate::news::types::{NaverNewsItem, NaverNewsResponse};
use crate::news::NewsSource;
use crate::time::kst;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::LazyLock;

const SEARCH_PATH: &str = "/v1/search/news.json";
const FALLBACK_SOURCE_LABEL: &str = "뉴스";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

#[derive(Debug, Clone)]
pub struct NaverNewsClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl NaverNewsClient {
    /// `None` when either half of the credential pair is missing.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let Some((client_id, client_secret)) = settings.naver_credentials() else {
            return Ok(None);
        };

        Ok(Some(Self {
            http: settings.http_client()?,
            base_url: settings.naver_base_url.clone(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }))
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PATH)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Naver-Client-Id", HeaderValue::from_str(&self.client_id)?);
        headers.insert(
            "X-Naver-Client-Secret",
            HeaderValue::from_str(&self.client_secret)?,
        );
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl NewsSource for NaverNewsClient {
    fn source_name(&self) -> &'static str {
        "naver"
    }

    async fn search(&self, query: &str, count: u32) -> Result<Vec<NewsItem>> {
        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .query(&[
                ("query", query.to_string()),
                ("display", count.to_string()),
                ("sort", "date".to_string()),
            ])
            .send()
            .await
            .context("Naver news request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Naver news response")?;
        if !status.is_success() {
            anyhow::bail!("Naver news HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<NaverNewsResponse>(&text)
            .context("failed to parse Naver news response")?;

        Ok(parsed
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| into_news_item(idx, item))
            .collect())
    }
}

fn into_news_item(idx: usize, item: NaverNewsItem) -> NewsItem {
    NewsItem {
        id: (idx + 1).to_string(),
        title: strip_tags(&item.title),
        source: display_source(&item.originallink),
        summary: strip_tags(&item.description),
        link: item.link,
        published_at: kst::format_published_at(&item.pub_date),
    }
}

pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Hostname of the publisher URL without a leading `www.`.
pub fn display_source(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => FALLBACK_SOURCE_LABEL.to_string(),
        },
        Err(_) => FALLBACK_SOURCE_LABEL.to_string(),
    }
}
