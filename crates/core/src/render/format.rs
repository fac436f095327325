use crate::domain::Outlook;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Thousands-separated number with at most three fraction digits (`72,500`, `1,234.5`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i != 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn format_won(value: f64) -> String {
    format!("{}원", format_number(value))
}

/// `round((target / current - 1) * 100)`, rounding halves up.
/// `None` when the current price cannot anchor a return.
pub fn expected_return_pct(current: f64, target: f64) -> Option<i64> {
    if !(current.is_finite() && target.is_finite()) || current <= 0.0 {
        return None;
    }
    let pct = (target / current - 1.0) * 100.0;
    Some((pct + 0.5).floor() as i64)
}

pub fn format_return(pct: i64) -> String {
    if pct >= 0 {
        format!("+{pct}%")
    } else {
        format!("{pct}%")
    }
}

pub fn outlook_label(outlook: Outlook) -> &'static str {
    match outlook {
        Outlook::Bullish => "📈 강세",
        Outlook::Bearish => "📉 약세",
        Outlook::Neutral => "➡️ 중립",
    }
}
