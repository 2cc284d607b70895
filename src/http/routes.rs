use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/record/start", post(handlers::start_recording))
        .route("/record/stop", post(handlers::stop_recording))
        // Transcript enrichment
        .route("/notes/summarize", post(handlers::summarize_note))
        .route("/notes/title", post(handlers::title_note))
        // Request logging + permissive CORS for browser frontends
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
