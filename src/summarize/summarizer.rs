use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::chunker::chunk_text;
use super::collapse_whitespace;
use super::generate::{GenerationConfig, TextGenerator};
use crate::config::SummaryConfig;

/// Bounds for the deterministic extractive fallback.
const FALLBACK_MAX_CHARS: usize = 600;
const FALLBACK_MIN_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The generative capability has no credentials; there is no meaningful
    /// narrative fallback without it.
    #[error("summarization unavailable: no generative API credentials configured")]
    Unavailable,
}

/// Summarizer configuration
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Maximum characters per chunk sent to the model.
    pub max_chars: usize,
    pub model: String,
    pub fallback_model: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl From<&SummaryConfig> for SummarizerConfig {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            max_chars: config.max_chars,
            model: config.model.clone(),
            fallback_model: config.fallback_model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Produces a narrative summary from a transcript.
///
/// Short transcripts are summarized in one call. Long ones are chunked, each
/// chunk is condensed into section notes, and a synthesis pass merges the
/// notes into the final narrative. Every generation step degrades
/// primary model → fallback model → deterministic extract, so the output is
/// non-empty whenever the input is.
pub struct HierarchicalSummarizer {
    generator: Option<Arc<dyn TextGenerator>>,
    config: SummarizerConfig,
}

impl HierarchicalSummarizer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: SummarizerConfig) -> Self {
        Self { generator, config }
    }

    pub async fn summarize(&self, transcript: &str) -> Result<String, SummarizeError> {
        let text = transcript.trim();
        if text.is_empty() {
            return Ok(String::new());
        }

        // Credential check comes before any chunking work.
        let generator = self.generator.as_ref().ok_or(SummarizeError::Unavailable)?;

        let chunks = chunk_text(text, self.config.max_chars);

        if chunks.len() == 1 {
            return Ok(self
                .generate_or_degrade(generator, &summary_prompt(&chunks[0]), &chunks[0])
                .await);
        }

        info!("Summarizing long transcript in {} chunks", chunks.len());

        let mut notes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let section = self
                .generate_or_degrade(generator, &section_prompt(chunk), chunk)
                .await;
            notes.push(section);
        }

        let combined = notes.join("\n\n");
        Ok(self
            .generate_or_degrade(generator, &synthesis_prompt(&combined), &combined)
            .await)
    }

    /// One degradation ladder step: primary model, then the fallback model if
    /// it is distinct, then the deterministic extract of `source`.
    async fn generate_or_degrade(
        &self,
        generator: &Arc<dyn TextGenerator>,
        prompt: &str,
        source: &str,
    ) -> String {
        let primary = GenerationConfig {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };

        if let Some(text) = attempt(generator.as_ref(), prompt, &primary).await {
            return text;
        }

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
            if let Some(text) = attempt(generator.as_ref(), prompt, &fallback).await {
                return text;
            }
        }

        warn!("All generation attempts empty; using extractive fallback");
        extractive_fallback(source)
    }
}

/// A single generation attempt. Transport failures and empty output both
/// yield `None` so the caller keeps descending the ladder.
async fn attempt(
    generator: &dyn TextGenerator,
    prompt: &str,
    config: &GenerationConfig,
) -> Option<String> {
    match generator.generate(prompt, config).await {
        Ok(result) => {
            let text = result.text.trim();
            if text.is_empty() {
                debug!(
                    "Empty generation from '{}' (finish reason {:?})",
                    config.model, result.finish_reason
                );
                None
            } else {
                Some(text.to_string())
            }
        }
        Err(e) => {
            warn!("Generation call on '{}' failed: {}", config.model, e);
            None
        }
    }
}

/// Deterministic non-network summary: collapse whitespace, truncate, and trim
/// back to the last sentence boundary when one lands past the minimum offset.
pub fn extractive_fallback(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.len() <= FALLBACK_MAX_CHARS {
        return collapsed;
    }

    let mut cut = FALLBACK_MAX_CHARS;
    while !collapsed.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = &collapsed[..cut];

    if let Some(pos) = truncated.rfind(|c: char| matches!(c, '.' | '!' | '?')) {
        if pos + 1 > FALLBACK_MIN_CHARS {
            return truncated[..=pos].to_string();
        }
    }

    format!("{}…", truncated.trim_end())
}

fn summary_prompt(text: &str) -> String {
    format!(
        "Write a concise summary paragraph (1-3 sentences, max 3). Keep it brief and \
         narrative: context, key points, decisions, responsibilities, challenges, and any \
         numbers or dates. Preserve specific tools, components, or features mentioned. \
         No labels, headings, bullets, or extra commentary.\n\n{text}"
    )
}

fn section_prompt(text: &str) -> String {
    format!(
        "Summarize this section of a longer transcript in 2-4 sentences. Keep concrete \
         facts, names, numbers, dates, and decisions. No labels, headings, or bullets.\n\n{text}"
    )
}

fn synthesis_prompt(notes: &str) -> String {
    format!(
        "The following are summaries of consecutive sections of one transcript. Combine \
         them into a single concise narrative paragraph (1-3 sentences, max 3). No labels, \
         headings, bullets, or extra commentary.\n\n{notes}"
    )
}
