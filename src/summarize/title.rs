use std::sync::Arc;
use tracing::{debug, warn};

use super::collapse_whitespace;
use super::generate::{GenerationConfig, TextGenerator};
use crate::config::SummaryConfig;

/// Title returned for an empty transcript, and when the heuristic finds no
/// words to work with.
pub const DEFAULT_TITLE: &str = "Untitled note";

const TITLE_TEMPERATURE: f32 = 0.2;
const TITLE_MAX_OUTPUT_TOKENS: u32 = 32;

/// Title generator configuration
#[derive(Debug, Clone)]
pub struct TitleConfig {
    pub model: String,
    pub fallback_model: Option<String>,
    /// Word budget for the heuristic first-sentence fallback.
    pub max_words: usize,
}

impl From<&SummaryConfig> for TitleConfig {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            model: config.model.clone(),
            fallback_model: config.fallback_model.clone(),
            max_words: config.title_max_words,
        }
    }
}

/// Produces a short title for a transcript.
///
/// Titles are an enrichment: generation failures are never surfaced, every
/// path ends in the heuristic fallback or the default title.
pub struct TitleGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    config: TitleConfig,
}

impl TitleGenerator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: TitleConfig) -> Self {
        Self { generator, config }
    }

    pub async fn title(&self, transcript: &str) -> String {
        let text = transcript.trim();
        if text.is_empty() {
            return DEFAULT_TITLE.to_string();
        }

        let Some(generator) = self.generator.as_ref() else {
            return heuristic_title(text, self.config.max_words);
        };

        let primary = GenerationConfig {
            model: self.config.model.clone(),
            temperature: TITLE_TEMPERATURE,
            max_output_tokens: TITLE_MAX_OUTPUT_TOKENS,
        };

        if let Some(title) = attempt(generator.as_ref(), &title_prompt(text), &primary).await {
            return title;
        }

        // One reworded retry, only against a distinct fallback model.
        if let Some(fallback_model) = self
            .config
            .fallback_model
            .as_ref()
            .filter(|model| **model != self.config.model)
        {
            let fallback = GenerationConfig {
                model: fallback_model.clone(),
                ..primary
            };
            if let Some(title) = attempt(generator.as_ref(), &retry_prompt(text), &fallback).await {
                return title;
            }
        }

        heuristic_title(text, self.config.max_words)
    }
}

async fn attempt(
    generator: &dyn TextGenerator,
    prompt: &str,
    config: &GenerationConfig,
) -> Option<String> {
    match generator.generate(prompt, config).await {
        Ok(result) => {
            let title = clean_title(&result.text);
            if title.is_empty() {
                debug!(
                    "Empty title from '{}' (finish reason {:?})",
                    config.model, result.finish_reason
                );
                None
            } else {
                Some(title)
            }
        }
        Err(e) => {
            warn!("Title generation on '{}' failed: {}", config.model, e);
            None
        }
    }
}

/// Normalize a model-produced title: collapse whitespace, strip one layer of
/// wrapping quotes, drop trailing sentence punctuation.
fn clean_title(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let unquoted = strip_wrapping_quotes(&collapsed);
    unquoted
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'))
        .trim()
        .to_string()
}

fn strip_wrapping_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];
    for (open, close) in PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

/// First sentence, truncated to the word budget.
fn heuristic_title(text: &str, max_words: usize) -> String {
    let sentence = match text.find(|c: char| matches!(c, '.' | '!' | '?')) {
        Some(pos) => &text[..pos],
        None => text,
    };

    let words: Vec<&str> = sentence.split_whitespace().take(max_words.max(1)).collect();
    if words.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        words.join(" ")
    }
}

fn title_prompt(text: &str) -> String {
    format!(
        "Write one short plain sentence that could serve as the title of this note. A few \
         words only, no quotes, no trailing punctuation.\n\n{text}"
    )
}

fn retry_prompt(text: &str) -> String {
    format!(
        "Suggest a brief descriptive heading, at most a handful of words, for the \
         following transcript.\n\n{text}"
    )
}
