use crate::config::Settings;
use crate::llm::error::LlmError;
use crate::llm::{LlmClient, Provider};
use anyhow::Context;
use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// `None` when `GEMINI_API_KEY` is not configured.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        let Ok(api_key) = settings.require_gemini_api_key() else {
            return Ok(None);
        };

        Ok(Some(Self {
            http: settings.http_client()?,
            api_key: api_key.to_string(),
            base_url: settings.gemini_base_url.clone(),
            model: settings.gemini_model.clone(),
        }))
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    async fn generate_content(&self, prompt: &str) -> anyhow::Result<GenerateContentResponse> {
        let res = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request(prompt))
            .send()
            .await
            .context("Gemini request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Gemini response body")?;
        if !status.is_success() {
            return Err(LlmError::http(Provider::Gemini, status.as_u16(), text).into());
        }

        serde_json::from_str::<GenerateContentResponse>(&text).map_err(|source| {
            anyhow::Error::from(LlmError::Decode {
                provider: Provider::Gemini,
                source,
                body: text,
            })
        })
    }

    fn first_candidate_text(res: GenerateContentResponse) -> Option<String> {
        res.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate_text(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let res = self.generate_content(prompt).await?;
        if let Some(reason) = res.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            tracing::warn!(model = %self.model, block_reason = reason, "Gemini blocked the prompt");
        }
        Ok(Self::first_candidate_text(res))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
