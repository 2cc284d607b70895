use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::SpeechConfig;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// No API key resolved from configuration or environment.
    #[error("no speech API credentials configured")]
    Unconfigured,

    #[error("failed to encode audio window: {0}")]
    Encode(#[from] hound::Error),

    #[error("recognition request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("recognition service returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("recognition timed out after {0} seconds")]
    Timeout(u64),
}

/// One transcription hypothesis for a window.
#[derive(Debug, Clone)]
pub struct RecognizedAlternative {
    pub transcript: String,
}

/// One recognition result; the service may return several per window.
#[derive(Debug, Clone)]
pub struct RecognizedResult {
    pub alternatives: Vec<RecognizedAlternative>,
    pub language_code: Option<String>,
}

/// Synchronous speech recognition boundary.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize one self-describing audio payload. Results are ordered;
    /// each carries one or more alternatives.
    async fn recognize(
        &self,
        audio_wav: &[u8],
        languages: &[String],
        model: &str,
    ) -> Result<Vec<RecognizedResult>, RecognitionError>;
}

/// Cloud speech-to-text client (v2-style `recognize` endpoint).
pub struct CloudSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
    timeout_seconds: u64,
}

impl CloudSpeechClient {
    pub fn new(config: &SpeechConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.resolve_api_key(),
            timeout_seconds: config.timeout_seconds,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
    language_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeAlternative {
    #[serde(default)]
    transcript: String,
}

#[async_trait::async_trait]
impl SpeechRecognizer for CloudSpeechClient {
    async fn recognize(
        &self,
        audio_wav: &[u8],
        languages: &[String],
        model: &str,
    ) -> Result<Vec<RecognizedResult>, RecognitionError> {
        let api_key = self.api_key.as_ref().ok_or(RecognitionError::Unconfigured)?;

        let content = base64::engine::general_purpose::STANDARD.encode(audio_wav);

        let body = serde_json::json!({
            "config": {
                "autoDecodingConfig": {},
                "languageCodes": languages,
                "model": model,
                "features": { "enableAutomaticPunctuation": true },
            },
            "content": content,
        });

        let url = format!(
            "{}/v2/projects/{}/locations/global/recognizers/_:recognize",
            self.endpoint, self.project_id
        );

        debug!(
            "Recognition request: {} bytes of audio, model '{}'",
            audio_wav.len(),
            model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecognitionError::Timeout(self.timeout_seconds)
                } else {
                    RecognitionError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let parsed: RecognizeResponse = response.json().await?;

        Ok(parsed
            .results
            .into_iter()
            .map(|result| RecognizedResult {
                alternatives: result
                    .alternatives
                    .into_iter()
                    .map(|alt| RecognizedAlternative {
                        transcript: alt.transcript,
                    })
                    .collect(),
                language_code: result.language_code,
            })
            .collect())
    }
}
