use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub speech: SpeechConfig,
    pub summarizer: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Preferred input device name. Falls back to the system default.
    pub device: Option<String>,
    /// When set, stopped captures are archived as WAV files in this directory.
    pub recordings_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub project_id: String,
    pub model: String,
    pub languages: Vec<String>,
    /// Maximum duration of a single recognition window, in seconds.
    pub chunk_seconds: u32,
    /// Overall bound on a single recognition call.
    pub timeout_seconds: u64,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    pub endpoint: String,
    pub model: String,
    pub fallback_model: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Maximum characters per summarization chunk.
    pub max_chars: usize,
    pub title_max_words: usize,
    pub api_key: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl SpeechConfig {
    /// Environment variables win over the config file so deployments can keep
    /// credentials out of checked-in configuration.
    pub fn resolve_api_key(&self) -> Option<String> {
        env_first(&["SPEECH_API_KEY", "GOOGLE_SPEECH_API_KEY"]).or_else(|| self.api_key.clone())
    }
}

impl SummaryConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        env_first(&["GOOGLE_SUMMARY_KEY", "GEMINI_API_KEY", "GOOGLE_AI_API_KEY"])
            .or_else(|| self.api_key.clone())
    }
}

fn env_first(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
