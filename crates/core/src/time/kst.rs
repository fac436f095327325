use anyhow::Context;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};

const KST_OFFSET_SECS: i32 = 9 * 3600;

pub fn kst() -> anyhow::Result<FixedOffset> {
    FixedOffset::east_opt(KST_OFFSET_SECS).context("invalid KST offset")
}

/// The run's calendar date: explicit `YYYY-MM-DD`, or today's KST date.
pub fn resolve_run_date(
    run_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = run_date_arg {
        return NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid run date {s:?}, expected YYYY-MM-DD"));
    }
    Ok(now_utc.with_timezone(&kst()?).date_naive())
}

/// `2026년 10월 19일 월요일`
pub fn korean_long_date(date: NaiveDate) -> String {
    format!(
        "{}년 {}월 {}일 {}",
        date.year(),
        date.month(),
        date.day(),
        korean_weekday(date.weekday())
    )
}

fn korean_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
        Weekday::Sun => "일요일",
    }
}

/// Re-renders an RFC 2822 publish time in KST (`2026. 1. 15. 09:30`).
/// Anything unparsable is returned as-is.
pub fn format_published_at(raw: &str) -> String {
    let Ok(kst) = kst() else {
        return raw.to_string();
    };
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(dt) => dt.with_timezone(&kst).format("%Y. %-m. %-d. %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
