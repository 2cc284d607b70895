//! Speech recognition
//!
//! - `client` talks to the cloud recognition API (self-describing WAV in,
//!   transcript alternatives out)
//! - `transcriber` windows a capture into bounded-duration chunks and merges
//!   the per-window results into one ordered transcript

pub mod client;
pub mod transcriber;
pub mod transcript;

pub use client::{
    CloudSpeechClient, RecognitionError, RecognizedAlternative, RecognizedResult, SpeechRecognizer,
};
pub use transcriber::{ChunkedTranscriber, TranscriberConfig};
pub use transcript::{Transcript, TranscriptSegment};
