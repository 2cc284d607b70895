use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RecordingError {
    /// Stop was called with nothing captured (idle or already drained).
    #[error("no audio recorded")]
    EmptyRecording,
}

/// A drained capture: the full sample sequence of one recording session.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioChunk {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

/// Point-in-time view of the session for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub recording: bool,
    pub buffered_samples: usize,
    pub buffered_seconds: f64,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct SessionState {
    recording: bool,
    samples: Vec<i16>,
    started_at: Option<DateTime<Utc>>,
}

/// A recording session fed by the audio-producer thread and controlled by
/// command handlers.
///
/// The producer calls `append_frame` continuously; `start`/`stop` may arrive
/// on any number of handler tasks. One mutex over the flag and the buffer is
/// the single serialization point, so a frame either lands entirely before a
/// drain or entirely in the next session — never split across both.
pub struct RecordingSession {
    sample_rate: u32,
    channels: u16,
    state: Mutex<SessionState>,
}

impl RecordingSession {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Start recording. Idempotent: a second start while recording keeps the
    /// buffer as-is.
    pub fn start(&self) {
        let mut state = self.lock_state();
        if state.recording {
            warn!("Recording already started");
            return;
        }

        state.samples.clear();
        state.recording = true;
        state.started_at = Some(Utc::now());
        info!("Recording started");
    }

    /// Append producer samples. Called from the audio callback path at any
    /// time; frames arriving while idle are discarded.
    pub fn append_frame(&self, samples: &[i16]) {
        let mut state = self.lock_state();
        if state.recording {
            state.samples.extend_from_slice(samples);
        }
    }

    /// Stop recording and drain the buffer.
    ///
    /// The flag flip and the buffer swap happen under one lock acquisition:
    /// frames appended before this call returns belong to this capture, later
    /// frames to the next session. Of two racing stops, at most one observes
    /// a non-empty buffer; the other fails with `EmptyRecording`.
    pub fn stop(&self) -> Result<AudioChunk, RecordingError> {
        let samples = {
            let mut state = self.lock_state();
            state.recording = false;
            state.started_at = None;
            std::mem::take(&mut state.samples)
        };

        if samples.is_empty() {
            return Err(RecordingError::EmptyRecording);
        }

        let chunk = AudioChunk {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        };
        info!("Recording stopped: {:.1}s captured", chunk.duration_seconds());

        Ok(chunk)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            recording: state.recording,
            buffered_samples: state.samples.len(),
            buffered_seconds: state.samples.len() as f64
                / (self.sample_rate as f64 * self.channels as f64),
            started_at: state.started_at,
        }
    }

    // Recover the guard if a panicking appender poisoned the lock; the buffer
    // itself is always in a consistent state between appends.
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
