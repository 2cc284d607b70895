pub mod audio;
pub mod config;
pub mod http;
pub mod recording;
pub mod speech;
pub mod summarize;

pub use audio::{AudioBackend, AudioBackendConfig, AudioFrame, MicrophoneBackend};
pub use config::Config;
pub use http::{create_router, AppState};
pub use recording::{AudioChunk, RecordingError, RecordingSession, SessionSnapshot};
pub use speech::{
    ChunkedTranscriber, CloudSpeechClient, RecognitionError, RecognizedAlternative,
    RecognizedResult, SpeechRecognizer, TranscriberConfig, Transcript, TranscriptSegment,
};
pub use summarize::{
    chunk_text, extractive_fallback, GenerationConfig, GenerationResult, GenerativeClient,
    HierarchicalSummarizer, SummarizeError, SummarizerConfig, TextGenerator, TitleConfig,
    TitleGenerator, DEFAULT_TITLE,
};
