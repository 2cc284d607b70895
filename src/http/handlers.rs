use super::state::AppState;
use crate::audio::archive_capture;
use crate::recording::RecordingError;
use crate::speech::RecognitionError;
use crate::summarize::SummarizeError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub recording: bool,
}

#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub capture_id: String,
    pub text: String,
    pub language: Option<String>,
    pub duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.snapshot();
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            recording: snapshot.recording,
        }),
    )
}

/// POST /record/start
/// Start (or keep) recording
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.session.start();
    (
        StatusCode::OK,
        Json(StartRecordingResponse {
            status: "recording".to_string(),
        }),
    )
}

/// POST /record/stop
/// Stop recording, transcribe the capture, and return the transcript
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    let chunk = match state.session.stop() {
        Ok(chunk) => chunk,
        Err(e @ RecordingError::EmptyRecording) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let capture_id = format!("capture-{}", uuid::Uuid::new_v4());
    info!(
        "Stopped capture {} ({:.1}s of audio)",
        capture_id,
        chunk.duration_seconds()
    );

    // The archive is best-effort; the transcript is the primary artifact.
    let archive_path = state.archive_dir.as_ref().and_then(|dir| {
        match archive_capture(dir, &capture_id, &chunk.samples, chunk.sample_rate, chunk.channels)
        {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!("Failed to archive capture {}: {}", capture_id, e);
                None
            }
        }
    });

    match state.transcriber.transcribe(&chunk).await {
        Ok(transcript) => (
            StatusCode::OK,
            Json(StopRecordingResponse {
                capture_id,
                text: transcript.text(),
                language: transcript.language().map(str::to_string),
                duration_seconds: chunk.duration_seconds(),
                archive_path,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Transcription failed for {}: {}", capture_id, e);
            let status = match e {
                RecognitionError::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /notes/summarize
/// Produce a narrative summary for a transcript
pub async fn summarize_note(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    match state.summarizer.summarize(&req.transcript).await {
        Ok(summary) => (StatusCode::OK, Json(SummarizeResponse { summary })).into_response(),
        Err(e @ SummarizeError::Unavailable) => {
            error!("Summarization failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /notes/title
/// Produce a short title for a transcript
pub async fn title_note(
    State(state): State<AppState>,
    Json(req): Json<TitleRequest>,
) -> impl IntoResponse {
    let title = state.titles.title(&req.transcript).await;
    (StatusCode::OK, Json(TitleResponse { title }))
}
