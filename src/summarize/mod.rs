//! Transcript enrichment
//!
//! - `chunker` splits long transcripts into bounded, sentence-respecting
//!   segments
//! - `generate` talks to the generative-text API
//! - `summarizer` builds a narrative summary hierarchically, degrading to a
//!   deterministic extract when the model yields nothing
//! - `title` produces a short title with a heuristic fallback

pub mod chunker;
pub mod generate;
pub mod summarizer;
pub mod title;

pub use chunker::chunk_text;
pub use generate::{GenerationConfig, GenerationResult, GenerativeClient, TextGenerator};
pub use summarizer::{
    extractive_fallback, HierarchicalSummarizer, SummarizeError, SummarizerConfig,
};
pub use title::{TitleConfig, TitleGenerator, DEFAULT_TITLE};

/// Normalize runs of whitespace (including newlines) to single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
