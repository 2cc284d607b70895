use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-call generation parameters.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// What the generative capability returned: possibly-empty text plus the
/// service's finish-reason code, when it reported one.
#[derive(Debug, Clone, Default)]
pub struct GenerationResult {
    pub text: String,
    pub finish_reason: Option<String>,
}

/// Synchronous generative-text boundary.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult>;
}

/// Generative-language API client (`generateContent`-style endpoint).
pub struct GenerativeClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GenerativeClient {
    pub fn new(endpoint: &str, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(GENERATE_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait::async_trait]
impl TextGenerator for GenerativeClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerationResult> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, config.model
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": config.temperature,
                "maxOutputTokens": config.max_output_tokens,
            },
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            anyhow::bail!("generative API returned {}: {}", status, message);
        }

        let parsed: GenerateResponse = response.json().await?;

        let result = match parsed.candidates.into_iter().next() {
            Some(candidate) => GenerationResult {
                text: candidate
                    .content
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .map(|part| part.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default(),
                finish_reason: candidate.finish_reason,
            },
            None => GenerationResult::default(),
        };

        debug!(
            "Generation on '{}': {} chars, finish reason {:?}",
            config.model,
            result.text.len(),
            result.finish_reason
        );

        Ok(result)
    }
}
