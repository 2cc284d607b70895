use crate::recording::RecordingSession;
use crate::speech::ChunkedTranscriber;
use crate::summarize::{HierarchicalSummarizer, TitleGenerator};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one recording session, shared with the audio producer
    pub session: Arc<RecordingSession>,
    pub transcriber: Arc<ChunkedTranscriber>,
    pub summarizer: Arc<HierarchicalSummarizer>,
    pub titles: Arc<TitleGenerator>,
    /// Capture archive directory, when configured
    pub archive_dir: Option<PathBuf>,
}
