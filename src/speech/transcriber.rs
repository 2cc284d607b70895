use std::sync::Arc;
use tracing::info;

use super::client::{RecognitionError, RecognizedResult, SpeechRecognizer};
use super::transcript::{Transcript, TranscriptSegment};
use crate::audio::encode_wav;
use crate::config::SpeechConfig;
use crate::recording::AudioChunk;

/// Transcriber configuration
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// Maximum duration of a single recognition window, in seconds.
    pub chunk_seconds: u32,
    /// Candidate language codes for recognition.
    pub languages: Vec<String>,
    /// Recognition model hint.
    pub model: String,
}

impl From<&SpeechConfig> for TranscriberConfig {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            chunk_seconds: config.chunk_seconds,
            languages: config.languages.clone(),
            model: config.model.clone(),
        }
    }
}

/// Turns a drained capture into an ordered transcript.
///
/// Long captures are partitioned into consecutive, non-overlapping windows of
/// `sample_rate * chunk_seconds` samples (the last window may be shorter) so
/// each recognition call stays inside the service's duration limit. Windows
/// are recognized sequentially and merged in order. Any window failure aborts
/// the whole transcription; no partial result is returned.
pub struct ChunkedTranscriber {
    recognizer: Arc<dyn SpeechRecognizer>,
    config: TranscriberConfig,
}

impl ChunkedTranscriber {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, mut config: TranscriberConfig) -> Self {
        // Window duration floor: a zeroed config degrades to 1-second windows.
        config.chunk_seconds = config.chunk_seconds.max(1);
        Self { recognizer, config }
    }

    pub async fn transcribe(&self, chunk: &AudioChunk) -> Result<Transcript, RecognitionError> {
        if chunk.samples.is_empty() {
            return Ok(Transcript::default());
        }

        let window_len = chunk.sample_rate as usize
            * chunk.channels.max(1) as usize
            * self.config.chunk_seconds as usize;

        let window_count = chunk.samples.chunks(window_len).len();
        info!(
            "Transcribing {:.1}s capture in {} window(s)",
            chunk.duration_seconds(),
            window_count
        );

        let mut segments = Vec::with_capacity(window_count);
        for (index, samples) in chunk.samples.chunks(window_len).enumerate() {
            let wav = encode_wav(samples, chunk.sample_rate, chunk.channels)?;
            let results = self
                .recognizer
                .recognize(&wav, &self.config.languages, &self.config.model)
                .await?;
            segments.push(merge_window(results, index));
        }

        Ok(Transcript { segments })
    }
}

/// Merge one window's recognition results: first alternative of each result,
/// space-joined; language from the first result that reports one.
fn merge_window(results: Vec<RecognizedResult>, chunk_index: usize) -> TranscriptSegment {
    let mut parts = Vec::new();
    let mut language = None;

    for result in results {
        if let Some(alternative) = result.alternatives.first() {
            let text = alternative.transcript.trim();
            if !text.is_empty() {
                parts.push(text.to_string());
            }
            if language.is_none() {
                language = result.language_code.clone();
            }
        }
    }

    TranscriptSegment {
        text: parts.join(" "),
        language,
        chunk_index,
    }
}
