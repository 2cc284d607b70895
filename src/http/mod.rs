//! HTTP API server for external control
//!
//! This module provides a REST API over the capture pipeline:
//! - POST /record/start - Start recording
//! - POST /record/stop - Stop recording and transcribe the capture
//! - POST /notes/summarize - Summarize a transcript
//! - POST /notes/title - Generate a title for a transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
