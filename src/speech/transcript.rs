use serde::{Deserialize, Serialize};

/// Transcription result for one recognition window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Language code reported by the recognizer, when it detected one.
    pub language: Option<String>,
    /// Index of the originating audio window.
    pub chunk_index: usize,
}

/// Ordered transcription of a whole capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Space-joined non-empty segment texts, in window order.
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|segment| segment.text.trim())
            .filter(|text| !text.is_empty())
            .collect();
        parts.join(" ")
    }

    /// Language of the first segment that carries one.
    pub fn language(&self) -> Option<&str> {
        self.segments
            .iter()
            .find_map(|segment| segment.language.as_deref())
    }
}
