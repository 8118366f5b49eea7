use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Multipart bodies carry the audio itself; allow the input ceiling plus
    // form overhead.
    let body_limit = DefaultBodyLimit::max(state.settings.max_input_bytes + 1024 * 1024);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route(
            "/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        .route("/sessions/:session_id", get(handlers::get_session))
        .route(
            "/sessions/:session_id/rename",
            post(handlers::rename_session),
        )
        .route(
            "/sessions/:session_id/finalize",
            post(handlers::finalize_session),
        )
        // Chunk processing
        .route(
            "/sessions/:session_id/chunks",
            post(handlers::upload_chunk),
        )
        .route("/uploads", post(handlers::upload_file))
        // Live updates
        .route(
            "/sessions/:session_id/events",
            get(handlers::session_events),
        )
        .layer(body_limit)
        // Browser clients consume the SSE feed cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
