use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static GREEDY_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array regex"));

#[derive(Debug, thiserror::Error)]
pub enum JsonArrayError {
    #[error("no JSON array found in model output")]
    NoArray,

    #[error("model output array does not match the expected shape: {0}")]
    Decode(#[source] serde_json::Error),
}

/// First `[` through last `]`, nested arrays included.
pub fn greedy_array(text: &str) -> Option<&str> {
    GREEDY_ARRAY_RE.find(text).map(|m| m.as_str())
}

/// Every top-level balanced `[...]` span, in order. Brackets inside JSON
/// strings do not count.
pub fn balanced_arrays(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'[' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    out.push(&text[start..=i]);
                }
            }
            b'"' if depth > 0 => in_string = true,
            _ => {}
        }
    }

    out
}

/// Decodes a JSON array of `T` out of free-form model output.
///
/// The greedy span is tried first; when it does not decode (several arrays,
/// stray brackets in prose), each balanced span is tried in order.
pub fn decode_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, JsonArrayError> {
    let mut candidates: Vec<&str> = Vec::new();
    if let Some(span) = greedy_array(text) {
        candidates.push(span);
    }
    for span in balanced_arrays(text) {
        if !candidates.contains(&span) {
            candidates.push(span);
        }
    }

    let mut first_err: Option<JsonArrayError> = None;
    for span in candidates {
        match serde_json::from_str::<Vec<T>>(span) {
            Ok(items) => return Ok(items),
            Err(err) => {
                first_err.get_or_insert(JsonArrayError::Decode(err));
            }
        }
    }

    Err(first_err.unwrap_or(JsonArrayError::NoArray))
}
