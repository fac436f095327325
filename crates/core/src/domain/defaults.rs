//! Hand-authored fallback datasets, substituted whenever a live source is
//! unavailable. Same types as the decoded success path.

use crate::domain::analysis::{
    DailyAnalysis, NewsItem, Outlook, SectorOrTheme, StockRecommendation,
};
use chrono::{DateTime, Utc};

pub const DEFAULT_INSIGHT: &str =
    "오늘도 분할 매수와 손절 원칙을 지키며 안정적인 투자를 권장합니다.";

/// (title, source, summary)
const SAMPLE_NEWS: [(&str, &str, &str); 2] = [
    (
        "반도체 업황 회복세 뚜렷...AI 수요 급증",
        "economy.sample.com",
        "AI 반도체 수요 증가로 업황 회복이 본격화되고 있습니다.",
    ),
    (
        "금리 인하 기대감에 성장주 강세",
        "finance.sample.com",
        "연준의 금리 인하 시사에 기술주 중심으로 상승세를 보이고 있습니다.",
    ),
];

/// (name, outlook, reason, keywords)
const DEFAULT_THEMES: [(&str, Outlook, &str, [&str; 5]); 3] = [
    (
        "AI/반도체",
        Outlook::Bullish,
        "AI 반도체 수요 급증, 글로벌 테크 기업 투자 확대",
        ["엔비디아", "HBM", "AI 가속기", "삼성전자", "SK하이닉스"],
    ),
    (
        "2차전지",
        Outlook::Neutral,
        "전기차 수요 둔화 우려 vs 장기 성장성",
        ["LG에너지솔루션", "삼성SDI", "전고체", "리튬", "ESS"],
    ),
    (
        "바이오",
        Outlook::Bullish,
        "신약 개발 성과 기대, FDA 승인 모멘텀",
        ["셀트리온", "삼성바이오로직스", "ADC", "비만치료제", "GLP-1"],
    ),
];

struct StockSeed {
    code: &'static str,
    name: &'static str,
    sector: &'static str,
    current: f64,
    target: f64,
    stop: f64,
    entry: f64,
    rsi: f64,
    support: f64,
    resistance: f64,
    fundamental: &'static str,
    technical: &'static str,
    scenario: &'static str,
}

const DEFAULT_STOCKS: [StockSeed; 3] = [
    StockSeed {
        code: "005930",
        name: "삼성전자",
        sector: "AI/반도체",
        current: 72500.0,
        target: 85000.0,
        stop: 68000.0,
        entry: 71000.0,
        rsi: 42.0,
        support: 70000.0,
        resistance: 75000.0,
        fundamental: "HBM 생산 확대로 AI 반도체 수혜 기대. 파운드리 경쟁력 회복 중.",
        technical: "60일선 지지 확인, RSI 과매도권 진입으로 반등 가능성.",
        scenario: "71,000원 부근 분할 매수 진입, 1차 목표 78,000원, 최종 목표 85,000원. 68,000원 이탈 시 손절.",
    },
    StockSeed {
        code: "000660",
        name: "SK하이닉스",
        sector: "AI/반도체",
        current: 178000.0,
        target: 220000.0,
        stop: 165000.0,
        entry: 175000.0,
        rsi: 55.0,
        support: 170000.0,
        resistance: 185000.0,
        fundamental: "HBM3E 독점 공급으로 수익성 개선. AI 서버 수요 급증.",
        technical: "상승 채널 유지 중. 185,000원 돌파 시 추가 상승 여력.",
        scenario: "175,000원 매수, 목표가 220,000원 (수익률 25%). 165,000원 손절.",
    },
    StockSeed {
        code: "068270",
        name: "셀트리온",
        sector: "바이오",
        current: 185000.0,
        target: 220000.0,
        stop: 170000.0,
        entry: 180000.0,
        rsi: 48.0,
        support: 175000.0,
        resistance: 195000.0,
        fundamental: "바이오시밀러 시장 확대와 신약 파이프라인 기대.",
        technical: "박스권 하단 지지 후 반등 시도 중.",
        scenario: "180,000원 분할 매수, 195,000원 돌파 시 추가 매수. 170,000원 손절.",
    },
];

/// Two-item sample feed. `published_at` is the run's display date.
pub fn sample_news(published_at: &str) -> Vec<NewsItem> {
    SAMPLE_NEWS
        .iter()
        .enumerate()
        .map(|(idx, (title, source, summary))| NewsItem {
            id: (idx + 1).to_string(),
            title: title.to_string(),
            source: source.to_string(),
            summary: summary.to_string(),
            link: "#".to_string(),
            published_at: published_at.to_string(),
        })
        .collect()
}

pub fn default_themes() -> Vec<SectorOrTheme> {
    DEFAULT_THEMES
        .iter()
        .map(|(name, outlook, reason, keywords)| SectorOrTheme {
            name: name.to_string(),
            outlook: *outlook,
            reason: reason.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            trigger_news: None,
            direct_beneficiary: None,
            indirect_beneficiary: None,
            risk: None,
        })
        .collect()
}

pub fn default_stocks() -> Vec<StockRecommendation> {
    DEFAULT_STOCKS
        .iter()
        .map(|s| StockRecommendation {
            code: s.code.to_string(),
            name: s.name.to_string(),
            sector: s.sector.to_string(),
            current_price: s.current,
            target_price: s.target,
            stop_loss: s.stop,
            entry_price: s.entry,
            rsi_value: s.rsi,
            support_level: s.support,
            resistance_level: s.resistance,
            fundamental_analysis: s.fundamental.to_string(),
            technical_analysis: s.technical.to_string(),
            investment_scenario: s.scenario.to_string(),
            risk_factor: None,
            why_now: None,
            hidden_link: None,
        })
        .collect()
}

/// What a run produces with every credential absent.
pub fn offline_analysis(date: &str, generated_at: DateTime<Utc>) -> DailyAnalysis {
    DailyAnalysis {
        date: date.to_string(),
        news: sample_news(date),
        sectors: default_themes(),
        stocks: default_stocks(),
        insight: Some(DEFAULT_INSIGHT.to_string()),
        generated_at,
        ai_powered: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_news_is_stable_and_dated() {
        let a = sample_news("2026년 10월 19일 월요일");
        let b = sample_news("2026년 10월 19일 월요일");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].id, "1");
        assert_eq!(
            a[0].summary,
            "AI 반도체 수요 증가로 업황 회복이 본격화되고 있습니다."
        );
        assert!(a.iter().all(|n| n.published_at == "2026년 10월 19일 월요일"));
    }

    #[test]
    fn default_sets_have_three_items() {
        assert_eq!(default_themes().len(), 3);
        assert_eq!(default_stocks().len(), 3);
        assert!(default_themes().iter().all(|t| t.keywords.len() == 5));
    }

    #[test]
    fn offline_analysis_uses_every_fallback() {
        let at = Utc::now();
        let a = offline_analysis("2026년 10월 19일 월요일", at);
        assert!(!a.ai_powered);
        assert_eq!(a.generated_at, at);
        assert_eq!(a.news, sample_news("2026년 10월 19일 월요일"));
        assert_eq!(a.stocks[0].code, "005930");
        assert_eq!(a.insight.as_deref(), Some(DEFAULT_INSIGHT));
    }
}
