//! Recording session management
//!
//! This module provides the `RecordingSession` abstraction that reconciles
//! the continuously running audio producer with start/stop commands:
//! - One mutex guards the recording flag and the sample buffer together
//! - Frames delivered while idle are discarded
//! - `stop()` atomically drains the buffer into an `AudioChunk`

mod session;

pub use session::{AudioChunk, RecordingError, RecordingSession, SessionSnapshot};
