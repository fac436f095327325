use crate::analysis::AnalysisVariant;
use crate::domain::{NewsItem, SectorOrTheme, StockRecommendation};

const STOCK_NEWS_LIMIT: usize = 5;

fn theme_schema(variant: AnalysisVariant) -> &'static str {
    match variant {
        AnalysisVariant::Simple => {
            r#"[
  {
    "name": "섹터명",
    "outlook": "bullish 또는 bearish 또는 neutral",
    "reason": "해당 섹터를 추천하는 구체적인 이유 (2-3문장)",
    "keywords": ["관련 키워드 5개"]
  }
]"#
        }
        AnalysisVariant::Advanced => {
            r#"[
  {
    "name": "테마명",
    "outlook": "bullish 또는 bearish 또는 neutral",
    "reason": "해당 테마를 추천하는 구체적인 이유 (2-3문장)",
    "keywords": ["관련 키워드 5개"],
    "triggerNews": "이 테마를 촉발한 뉴스 한 줄 요약",
    "directBeneficiary": "직접 수혜 업종/종목",
    "indirectBeneficiary": "간접 수혜 업종/종목 (공급망, 부품, 장비 등)",
    "risk": "테마의 핵심 리스크"
  }
]"#
        }
    }
}

fn stock_schema(variant: AnalysisVariant) -> &'static str {
    match variant {
        AnalysisVariant::Simple => {
            r#"[
  {
    "code": "종목코드 (예: 005930)",
    "name": "종목명",
    "sector": "해당 섹터",
    "currentPrice": 현재가(숫자),
    "targetPrice": 목표가(숫자),
    "stopLoss": 손절가(숫자),
    "entryPrice": 진입가(숫자),
    "rsiValue": RSI값(30-70 사이 숫자),
    "supportLevel": 지지선(숫자),
    "resistanceLevel": 저항선(숫자),
    "fundamentalAnalysis": "기본적 분석 (2-3문장)",
    "technicalAnalysis": "기술적 분석 (2-3문장)",
    "investmentScenario": "구체적인 매매 시나리오"
  }
]"#
        }
        AnalysisVariant::Advanced => {
            r#"[
  {
    "code": "종목코드 (예: 005930)",
    "name": "종목명",
    "sector": "해당 테마",
    "currentPrice": 현재가(숫자),
    "targetPrice": 목표가(숫자),
    "stopLoss": 손절가(숫자),
    "entryPrice": 진입가(숫자),
    "rsiValue": RSI값(30-70 사이 숫자),
    "supportLevel": 지지선(숫자),
    "resistanceLevel": 저항선(숫자),
    "fundamentalAnalysis": "기본적 분석 (2-3문장)",
    "technicalAnalysis": "기술적 분석 (2-3문장)",
    "investmentScenario": "구체적인 매매 시나리오",
    "riskFactor": "핵심 리스크 요인",
    "whyNow": "지금 주목해야 하는 이유",
    "hiddenLink": "테마와 이 종목을 잇는 숨은 연결고리"
  }
]"#
        }
    }
}

pub fn themes_prompt(news: &[NewsItem], variant: AnalysisVariant) -> String {
    let news_text = news
        .iter()
        .map(|n| format!("- {}: {}", n.title, n.summary))
        .collect::<Vec<_>>()
        .join("\n");
    let n = variant.pick_count();

    let extra = match variant {
        AnalysisVariant::Simple => "",
        AnalysisVariant::Advanced => {
            "\n뉴스가 직접 언급하지 않더라도 파급 효과로 수혜를 입을 테마를 우선 고려하세요."
        }
    };

    format!(
        "당신은 전문 증권 애널리스트입니다. 다음 뉴스를 분석하여 투자 유망 섹터를 추천해주세요.\n\n\
오늘의 주요 뉴스:\n{news_text}\n\n\
다음 JSON 형식으로 정확히 {n}개의 유망 섹터를 분석해주세요:{extra}\n{schema}\n\n\
JSON만 출력하세요.",
        schema = theme_schema(variant),
    )
}

pub fn stocks_prompt(
    themes: &[SectorOrTheme],
    news: &[NewsItem],
    variant: AnalysisVariant,
) -> String {
    let theme_names = themes
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let news_text = news
        .iter()
        .take(STOCK_NEWS_LIMIT)
        .map(|n| format!("- {}", n.title))
        .collect::<Vec<_>>()
        .join("\n");
    let n = variant.pick_count();

    let guidance = match variant {
        AnalysisVariant::Simple => "실제 한국 상장 종목만 추천하세요.".to_string(),
        AnalysisVariant::Advanced => [
            "실제 현재 상장된 한국 종목만 추천하세요.",
            "누구나 아는 대형주보다 시장이 아직 주목하지 않은 중소형 숨은 수혜주를 우선하세요.",
            "대형주는 모멘텀이 압도적으로 강할 때만 포함하세요.",
        ]
        .join(" "),
    };

    format!(
        "당신은 전문 증권 애널리스트입니다. 다음 정보를 바탕으로 투자 종목을 추천해주세요.\n\n\
유망 섹터: {theme_names}\n\n\
최근 뉴스:\n{news_text}\n\n\
다음 JSON 형식으로 정확히 {n}개의 종목을 추천해주세요. {guidance}\n{schema}\n\n\
JSON만 출력하세요.",
        schema = stock_schema(variant),
    )
}

pub fn insight_prompt(themes: &[SectorOrTheme], stocks: &[StockRecommendation]) -> String {
    let theme_names = themes
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let stock_names = stocks
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "당신은 전문 투자 자문가입니다. 오늘의 시장 상황을 종합하여 간단한 투자 조언을 작성해주세요.\n\n\
유망 섹터: {theme_names}\n\
추천 종목: {stock_names}\n\n\
100자 이내로 오늘의 핵심 투자 포인트를 작성해주세요."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::defaults;

    #[test]
    fn themes_prompt_embeds_every_headline() {
        let news = defaults::sample_news("오늘");
        let prompt = themes_prompt(&news, AnalysisVariant::Simple);
        assert!(prompt.contains("- 반도체 업황 회복세 뚜렷...AI 수요 급증: AI 반도체 수요"));
        assert!(prompt.contains("- 금리 인하 기대감에 성장주 강세"));
        assert!(prompt.contains("정확히 3개"));
        assert!(!prompt.contains("triggerNews"));
    }

    #[test]
    fn advanced_prompts_ask_for_four_with_extra_fields() {
        let news = defaults::sample_news("오늘");
        let themes = defaults::default_themes();
        let t = themes_prompt(&news, AnalysisVariant::Advanced);
        assert!(t.contains("정확히 4개"));
        assert!(t.contains("indirectBeneficiary"));

        let s = stocks_prompt(&themes, &news, AnalysisVariant::Advanced);
        assert!(s.contains("정확히 4개"));
        assert!(s.contains("hiddenLink"));
        assert!(s.contains("중소형"));
    }

    #[test]
    fn stocks_prompt_uses_at_most_five_headlines() {
        let mut news = Vec::new();
        for i in 0..8 {
            let mut item = defaults::sample_news("오늘").remove(0);
            item.title = format!("헤드라인{i}");
            news.push(item);
        }
        let prompt = stocks_prompt(&defaults::default_themes(), &news, AnalysisVariant::Simple);
        assert!(prompt.contains("헤드라인4"));
        assert!(!prompt.contains("헤드라인5"));
        assert!(prompt.contains("유망 섹터: AI/반도체, 2차전지, 바이오"));
    }

    #[test]
    fn insight_prompt_lists_names() {
        let prompt = insight_prompt(&defaults::default_themes(), &defaults::default_stocks());
        assert!(prompt.contains("추천 종목: 삼성전자, SK하이닉스, 셀트리온"));
    }
}
