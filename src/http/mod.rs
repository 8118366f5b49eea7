//! HTTP API server.
//!
//! Routes:
//! - POST /sessions - Create a session
//! - GET  /sessions - List the caller's sessions
//! - GET  /sessions/:id - Session detail with chunks and notes
//! - POST /sessions/:id/rename - Rename a session
//! - POST /sessions/:id/finalize - Close out with a final summary
//! - POST /sessions/:id/chunks - Process one audio piece
//! - POST /uploads - Whole-file pipeline (split, process, finalize)
//! - GET  /sessions/:id/events - SSE stream of note/summary updates
//! - GET  /health - Health check
//!
//! Authentication is external: handlers trust the `x-user-id` header set by
//! the authenticating proxy and verify session ownership against it.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppSettings, AppState};
