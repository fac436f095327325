use serde::Deserialize;

/// `GET /v1/search/news.json` response body. Paging fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NaverNewsResponse {
    #[serde(default)]
    pub items: Vec<NaverNewsItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaverNewsItem {
    pub title: String,
    #[serde(default)]
    pub originallink: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pub_date: String,
}
