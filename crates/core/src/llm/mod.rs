pub mod error;
pub mod gemini;
pub mod json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
}

/// Free-form text generation. The reply is untrusted and may be anything.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// `Ok(None)` when the provider answered without any text.
    async fn generate_text(&self, prompt: &str) -> anyhow::Result<Option<String>>;
}
