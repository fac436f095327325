use crate::llm::Provider;
use serde::Deserialize;

/// Transport-level model failures. Raw bodies are kept for the logs.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{provider:?} HTTP {status} ({}): {body}", .api_status.as_deref().unwrap_or("unknown"))]
    Http {
        provider: Provider,
        status: u16,
        api_status: Option<String>,
        body: String,
    },

    #[error("{provider:?} response did not decode: {source}; body={body}")]
    Decode {
        provider: Provider,
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl LlmError {
    pub fn http(provider: Provider, status: u16, body: String) -> Self {
        Self::Http {
            provider,
            status,
            api_status: api_status(&body),
            body,
        }
    }

    /// Rate limiting and server-side failures; nothing about the prompt itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == 429 || *status >= 500)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
}

/// `error.status` from a Google-style error body (`RESOURCE_EXHAUSTED`, ...).
fn api_status(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body).ok()?.error.status
}
