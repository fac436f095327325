//! HTML report. Pure string templating over a [`DailyAnalysis`]; the same
//! value always renders to the same bytes.

pub mod format;

use crate::domain::{DailyAnalysis, NewsItem, Outlook, SectorOrTheme, StockRecommendation};
use format::{escape_html, expected_return_pct, format_return, format_won, outlook_label};

const REPORT_NEWS_LIMIT: usize = 5;
const EMPTY_NOTE: &str = r#"<p class="empty">데이터가 없습니다.</p>"#;

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; line-height: 1.6; color: #333; max-width: 700px; margin: 0 auto; padding: 20px; }
    h1 { color: #1a1a2e; border-bottom: 3px solid #4f46e5; padding-bottom: 10px; }
    h2 { color: #4f46e5; margin-top: 30px; }
    .insight { background: linear-gradient(135deg, #4f46e5 0%, #7c3aed 100%); color: white; padding: 20px; border-radius: 12px; margin: 20px 0; }
    .insight p { margin: 0; font-size: 16px; }
    .ai-badge { background: #fbbf24; color: #1a1a2e; padding: 4px 8px; border-radius: 4px; font-size: 11px; font-weight: 600; }
    .fallback-badge { background: #e2e8f0; color: #475569; padding: 4px 8px; border-radius: 4px; font-size: 11px; font-weight: 600; }
    .card { background: #f8fafc; border-radius: 12px; padding: 16px; margin: 12px 0; border-left: 4px solid #4f46e5; }
    .bullish { border-left-color: #22c55e; }
    .bearish { border-left-color: #ef4444; }
    .neutral { border-left-color: #f59e0b; }
    .badge { display: inline-block; padding: 4px 12px; border-radius: 20px; font-size: 12px; font-weight: 600; }
    .badge-bullish { background: #dcfce7; color: #166534; }
    .badge-bearish { background: #fee2e2; color: #991b1b; }
    .badge-neutral { background: #fef3c7; color: #92400e; }
    .badge-sector { background: #e0e7ff; color: #4338ca; margin-left: 8px; }
    .stock-grid { display: grid; gap: 8px; margin-top: 8px; }
    .stock-row { display: flex; justify-content: space-between; padding: 8px; background: white; border-radius: 8px; }
    .price { font-weight: 600; color: #4f46e5; }
    .target { color: #22c55e; }
    .stop { color: #ef4444; }
    .keywords { display: flex; gap: 8px; flex-wrap: wrap; margin-top: 8px; }
    .keyword { background: #e0e7ff; color: #4338ca; padding: 4px 10px; border-radius: 16px; font-size: 12px; }
    .detail { color: #475569; font-size: 14px; margin: 4px 0; }
    .news-link { color: #4f46e5; text-decoration: none; }
    .news-source { color: #64748b; font-size: 12px; }
    .empty { color: #94a3b8; }
    .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #e2e8f0; color: #64748b; font-size: 12px; }
"#;

pub fn render_html(analysis: &DailyAnalysis) -> String {
    let badge = if analysis.ai_powered {
        r#"<span class="ai-badge">🤖 AI Powered</span>"#
    } else {
        r#"<span class="fallback-badge">기본 분석</span>"#
    };

    let insight = analysis
        .insight
        .as_deref()
        .map(|text| {
            format!(
                r#"<div class="insight">
    <p>💡 <strong>오늘의 투자 포인트:</strong> {}</p>
  </div>"#,
                escape_html(text)
            )
        })
        .unwrap_or_default();

    let news = section(
        analysis.news.iter().take(REPORT_NEWS_LIMIT).map(news_card),
    );
    let sectors = section(analysis.sectors.iter().map(sector_card));
    let stocks = section(analysis.stocks.iter().map(stock_card));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>{STYLE}  </style>
</head>
<body>
  <h1>📈 오늘의 AI 투자 분석 {badge}</h1>
  <p><strong>{date}</strong></p>

  {insight}

  <h2>📰 주요 뉴스</h2>
  {news}

  <h2>🎯 AI 추천 유망 섹터</h2>
  {sectors}

  <h2>💎 AI 추천 종목</h2>
  {stocks}

  <div class="footer">
    <p>⚠️ 본 분석은 AI가 생성한 참고용 정보이며, 투자의 최종 책임은 본인에게 있습니다.</p>
    <p>🤖 Powered by Google Gemini AI | 매일 자동 생성</p>
  </div>
</body>
</html>
"#,
        date = escape_html(&analysis.date),
    )
}

fn section(cards: impl Iterator<Item = String>) -> String {
    let joined = cards.collect::<String>();
    if joined.is_empty() {
        EMPTY_NOTE.to_string()
    } else {
        joined
    }
}

fn news_card(item: &NewsItem) -> String {
    format!(
        r#"
    <div class="card">
      <a href="{link}" class="news-link"><strong>{title}</strong></a>
      <p class="news-source">{source} · {published_at}</p>
      <p>{summary}</p>
    </div>
  "#,
        link = escape_html(&item.link),
        title = escape_html(&item.title),
        source = escape_html(&item.source),
        published_at = escape_html(&item.published_at),
        summary = escape_html(&item.summary),
    )
}

/// `outlook` is already one of three values; the class name follows it.
fn outlook_class(outlook: Outlook) -> &'static str {
    outlook.as_str()
}

fn detail(label: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => format!(
            r#"<p class="detail"><strong>{label}:</strong> {}</p>"#,
            escape_html(v)
        ),
        _ => String::new(),
    }
}

fn sector_card(sector: &SectorOrTheme) -> String {
    let class = outlook_class(sector.outlook);
    let keywords = sector
        .keywords
        .iter()
        .map(|k| format!(r#"<span class="keyword">{}</span>"#, escape_html(k)))
        .collect::<String>();
    let extras = [
        detail("📰 촉발 뉴스", sector.trigger_news.as_deref()),
        detail("🎯 직접 수혜", sector.direct_beneficiary.as_deref()),
        detail("🔗 간접 수혜", sector.indirect_beneficiary.as_deref()),
        detail("⚠️ 리스크", sector.risk.as_deref()),
    ]
    .concat();

    format!(
        r#"
    <div class="card {class}">
      <strong>{name}</strong>
      <span class="badge badge-{class}">{label}</span>
      <p>{reason}</p>
      {extras}
      <div class="keywords">{keywords}</div>
    </div>
  "#,
        name = escape_html(&sector.name),
        label = outlook_label(sector.outlook),
        reason = escape_html(&sector.reason),
    )
}

fn stock_card(stock: &StockRecommendation) -> String {
    let expected_return = expected_return_pct(stock.current_price, stock.target_price)
        .map(|pct| format!(" ({})", format_return(pct)))
        .unwrap_or_default();
    let extras = [
        detail("⏰ 지금 주목할 이유", stock.why_now.as_deref()),
        detail("🔗 숨은 연결고리", stock.hidden_link.as_deref()),
        detail("⚠️ 리스크", stock.risk_factor.as_deref()),
    ]
    .concat();

    format!(
        r#"
    <div class="card">
      <strong>{name}</strong> <span style="color:#64748b">({code})</span>
      <span class="badge badge-sector">{sector}</span>
      <div class="stock-grid">
        <div class="stock-row"><span>현재가</span><span class="price">{current}</span></div>
        <div class="stock-row"><span>목표가</span><span class="target">{target}{expected_return}</span></div>
        <div class="stock-row"><span>손절가</span><span class="stop">{stop}</span></div>
        <div class="stock-row"><span>진입가</span><span>{entry}</span></div>
        <div class="stock-row"><span>지지선 / 저항선</span><span>{support} / {resistance}</span></div>
        <div class="stock-row"><span>RSI</span><span>{rsi}</span></div>
      </div>
      <p><strong>🔍 기본적 분석:</strong> {fundamental}</p>
      <p><strong>📊 기술적 분석:</strong> {technical}</p>
      <p><strong>🎯 투자 시나리오:</strong> {scenario}</p>
      {extras}
    </div>
  "#,
        name = escape_html(&stock.name),
        code = escape_html(&stock.code),
        sector = escape_html(&stock.sector),
        current = format_won(stock.current_price),
        target = format_won(stock.target_price),
        stop = format_won(stock.stop_loss),
        entry = format_won(stock.entry_price),
        support = format_won(stock.support_level),
        resistance = format_won(stock.resistance_level),
        rsi = format::format_number(stock.rsi_value),
        fundamental = escape_html(&stock.fundamental_analysis),
        technical = escape_html(&stock.technical_analysis),
        scenario = escape_html(&stock.investment_scenario),
    )
}
