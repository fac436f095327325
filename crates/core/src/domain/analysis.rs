use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub summary: String,
    pub link: String,
    #[serde(alias = "pubDate")]
    pub published_at: String,
}

/// Directional view on a theme. Closed set: unknown labels collapse to `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Outlook {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bullish" => Self::Bullish,
            "bearish" => Self::Bearish,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl<'de> Deserialize<'de> for Outlook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorOrTheme {
    pub name: String,
    #[serde(default)]
    pub outlook: Outlook,
    pub reason: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_news: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_beneficiary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indirect_beneficiary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecommendation {
    pub code: String,
    pub name: String,
    #[serde(alias = "theme")]
    pub sector: String,
    pub current_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    pub entry_price: f64,
    pub rsi_value: f64,
    pub support_level: f64,
    pub resistance_level: f64,
    pub fundamental_analysis: String,
    pub technical_analysis: String,
    pub investment_scenario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_factor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_now: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_link: Option<String>,
}

/// Everything one run produces. Persisted as JSON and consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAnalysis {
    pub date: String,
    pub news: Vec<NewsItem>,
    pub sectors: Vec<SectorOrTheme>,
    pub stocks: Vec<StockRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub ai_powered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outlook_collapses_unknown_labels_to_neutral() {
        let parsed: Vec<Outlook> =
            serde_json::from_value(json!(["bullish", "BEARISH", "neutral", "strong_buy", ""]))
                .unwrap();
        assert_eq!(
            parsed,
            vec![
                Outlook::Bullish,
                Outlook::Bearish,
                Outlook::Neutral,
                Outlook::Neutral,
                Outlook::Neutral
            ]
        );
        assert_eq!(serde_json::to_value(Outlook::Bearish).unwrap(), json!("bearish"));
    }

    #[test]
    fn theme_accepts_missing_optional_fields() {
        let theme: SectorOrTheme = serde_json::from_value(json!({
            "name": "조선",
            "outlook": "bullish",
            "reason": "수주 잔고 증가",
        }))
        .unwrap();
        assert!(theme.keywords.is_empty());
        assert!(theme.trigger_news.is_none());

        let out = serde_json::to_value(&theme).unwrap();
        assert!(out.get("triggerNews").is_none());
        assert_eq!(out["keywords"], json!([]));
    }

    #[test]
    fn stock_accepts_theme_alias_and_advanced_fields() {
        let stock: StockRecommendation = serde_json::from_value(json!({
            "code": "010140",
            "name": "삼성중공업",
            "theme": "조선",
            "currentPrice": 10000,
            "targetPrice": 12000,
            "stopLoss": 9000,
            "entryPrice": 9800,
            "rsiValue": 55.5,
            "supportLevel": 9500,
            "resistanceLevel": 10500,
            "fundamentalAnalysis": "f",
            "technicalAnalysis": "t",
            "investmentScenario": "s",
            "whyNow": "LNG선 발주",
            "hiddenLink": "기자재 공급망",
        }))
        .unwrap();
        assert_eq!(stock.sector, "조선");
        assert_eq!(stock.current_price, 10000.0);
        assert_eq!(stock.why_now.as_deref(), Some("LNG선 발주"));
        assert!(stock.risk_factor.is_none());
    }

    #[test]
    fn stock_rejects_non_numeric_price() {
        let res = serde_json::from_value::<StockRecommendation>(json!({
            "code": "005930",
            "name": "삼성전자",
            "sector": "반도체",
            "currentPrice": "현재가",
            "targetPrice": 1,
            "stopLoss": 1,
            "entryPrice": 1,
            "rsiValue": 1,
            "supportLevel": 1,
            "resistanceLevel": 1,
            "fundamentalAnalysis": "",
            "technicalAnalysis": "",
            "investmentScenario": "",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn news_item_accepts_legacy_pub_date_key() {
        let item: NewsItem = serde_json::from_value(json!({
            "id": "1",
            "title": "t",
            "source": "s",
            "summary": "m",
            "link": "#",
            "pubDate": "2026. 1. 15. 09:30",
        }))
        .unwrap();
        assert_eq!(item.published_at, "2026. 1. 15. 09:30");
        assert!(serde_json::to_value(&item).unwrap().get("publishedAt").is_some());
    }
}
