use std::convert::Infallible;

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::state::AppState;
use crate::audio::SplitStrategy;
use crate::error::Error;
use crate::live;
use crate::pipeline::{ChunkProcessor, ChunkRequest, Finalizer, UploadPipeline};
use crate::store::{authorize, Chunk, NewSession, Note, Profile, Session, SessionPatch};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: Option<String>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetailResponse {
    pub session: Session,
    pub chunks: Vec<Chunk>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// Identity of the caller. Authentication itself is external; the
/// authenticating proxy passes the verified user id in this header.
const USER_HEADER: &str = "x-user-id";

fn caller(headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "missing x-user-id header".to_string(),
                }),
            )
                .into_response()
        })
}

fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::Unauthorized(_) => StatusCode::FORBIDDEN,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        Error::DecodeFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::TranscriptionFailed(_) | Error::SummarizationFailed(_) => StatusCode::BAD_GATEWAY,
        Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn parse_profile(value: &str) -> Option<Profile> {
    match value {
        "meeting" => Some(Profile::Meeting),
        "lecture" => Some(Profile::Lecture),
        "interview" => Some(Profile::Interview),
        "freeform" => Some(Profile::Freeform),
        _ => None,
    }
}

fn parse_strategy(value: &str) -> Option<SplitStrategy> {
    match value {
        "byteslice" => Some(SplitStrategy::ByteSlice),
        "decode" => Some(SplitStrategy::Decode),
        _ => None,
    }
}

/// Strip the extension from an uploaded filename for use as a default
/// session name.
fn name_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// POST /sessions
/// Begin a new recording/upload effort.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let new = NewSession {
        owner_id,
        name: req
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Untitled session".to_string()),
        profile: req.profile.unwrap_or_default(),
    };

    match state.store.create_session(new).await {
        Ok(session) => {
            info!(session_id = %session.id, "session created");
            (StatusCode::CREATED, Json(session)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /sessions
/// List the caller's sessions, newest first.
pub async fn list_sessions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    match state.store.sessions_for_owner(&owner_id).await {
        Ok(sessions) => (StatusCode::OK, Json(SessionListResponse { sessions })).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /sessions/:session_id
/// Session detail with its chunks and notes.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let session = match authorize(state.store.as_ref(), &session_id, &owner_id).await {
        Ok(session) => session,
        Err(e) => return error_response(e),
    };

    let chunks = match state.store.chunks_for_session(&session_id).await {
        Ok(chunks) => chunks,
        Err(e) => return error_response(e),
    };
    let notes = match state.store.notes_for_session(&session_id).await {
        Ok(notes) => notes,
        Err(e) => return error_response(e),
    };

    (
        StatusCode::OK,
        Json(SessionDetailResponse {
            session,
            chunks,
            notes,
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/rename
pub async fn rename_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<RenameSessionRequest>,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    if req.name.trim().is_empty() {
        return bad_request("name must not be empty");
    }

    if let Err(e) = authorize(state.store.as_ref(), &session_id, &owner_id).await {
        return error_response(e);
    }

    let patch = SessionPatch {
        name: Some(req.name),
        ..Default::default()
    };
    match state.store.update_session(&session_id, patch).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /sessions/:session_id/finalize
/// Close out the session with one consolidated summary.
pub async fn finalize_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let session = match authorize(state.store.as_ref(), &session_id, &owner_id).await {
        Ok(session) => session,
        Err(e) => return error_response(e),
    };

    let finalizer = Finalizer::new(state.store.clone(), state.completer.clone());
    match finalizer.finalize(&session_id, session.profile).await {
        Ok(finalized) => {
            // Notification is best effort and must not delay the response.
            if let Some(summary) = finalized.final_summary.clone().filter(|s| !s.is_empty()) {
                let notifier = state.notifier.clone();
                let owner = finalized.owner_id.clone();
                let name = finalized.name.clone();
                tokio::spawn(async move {
                    notifier.summary_ready(&owner, &name, &summary).await;
                });
            }
            (StatusCode::OK, Json(finalized)).into_response()
        }
        Err(e) => {
            error!(session_id = %session_id, "finalization failed: {}", e);
            error_response(e)
        }
    }
}

/// POST /sessions/:session_id/chunks
/// Process one audio piece: multipart fields `audio` (file), `seq`,
/// optional `seconds`.
pub async fn upload_chunk(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let session = match authorize(state.store.as_ref(), &session_id, &owner_id).await {
        Ok(session) => session,
        Err(e) => return error_response(e),
    };

    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut seq: Option<u32> = None;
    let mut seconds: u32 = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return bad_request(&format!("invalid multipart body: {}", e)),
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("audio") => {
                let filename = field
                    .file_name()
                    .unwrap_or("audio.webm")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => audio = Some((bytes.to_vec(), filename)),
                    Err(e) => return bad_request(&format!("failed to read audio: {}", e)),
                }
            }
            Some("seq") => match field.text().await.ok().and_then(|t| t.parse().ok()) {
                Some(value) => seq = Some(value),
                None => return bad_request("seq must be a non-negative integer"),
            },
            Some("seconds") => {
                seconds = field
                    .text()
                    .await
                    .ok()
                    .and_then(|t| t.parse::<f64>().ok())
                    .map(|s| s.round() as u32)
                    .unwrap_or(0);
            }
            _ => {}
        }
    }

    let (audio, filename) = match audio {
        Some(audio) => audio,
        None => return bad_request("missing audio field"),
    };
    let seq = match seq {
        Some(seq) => seq,
        None => return bad_request("missing seq field"),
    };

    let processor = ChunkProcessor::new(
        state.store.clone(),
        state.transcriber.clone(),
        state.completer.clone(),
    );
    let request = ChunkRequest {
        session_id,
        seq,
        audio,
        filename,
        profile: session.profile,
        duration_seconds: seconds,
    };

    match processor.process(request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!("chunk processing failed: {}", e);
            error_response(e)
        }
    }
}

/// POST /uploads
/// Whole-file pipeline: multipart fields `file`, optional `profile`,
/// `name`, `strategy` (`byteslice` | `decode`).
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let mut file: Option<(Vec<u8>, String)> = None;
    let mut profile = Profile::default();
    let mut name: Option<String> = None;
    let mut strategy = SplitStrategy::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return bad_request(&format!("invalid multipart body: {}", e)),
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.webm").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((bytes.to_vec(), filename)),
                    Err(e) => return bad_request(&format!("failed to read file: {}", e)),
                }
            }
            Some("profile") => match field.text().await.ok().as_deref().and_then(parse_profile) {
                Some(value) => profile = value,
                None => return bad_request("unknown profile"),
            },
            Some("name") => {
                name = field.text().await.ok().filter(|n| !n.trim().is_empty());
            }
            Some("strategy") => {
                match field.text().await.ok().as_deref().and_then(parse_strategy) {
                    Some(value) => strategy = value,
                    None => return bad_request("unknown split strategy"),
                }
            }
            _ => {}
        }
    }

    let (bytes, filename) = match file {
        Some(file) => file,
        None => return bad_request("missing file field"),
    };
    let name = name.unwrap_or_else(|| name_from_filename(&filename));

    let pipeline = UploadPipeline::new(
        state.store.clone(),
        state.transcriber.clone(),
        state.completer.clone(),
        state.settings.upload,
    );

    match pipeline
        .run(&owner_id, &name, profile, &bytes, &filename, strategy)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!("upload pipeline failed: {}", e);
            error_response(e)
        }
    }
}

/// GET /sessions/:session_id/events
/// Server-sent event stream of note and summary updates.
pub async fn session_events(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let owner_id = match caller(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    // Ownership is checked once at connection open; the feed itself does
    // not re-check per poll.
    if let Err(e) = authorize(state.store.as_ref(), &session_id, &owner_id).await {
        return error_response(e);
    }

    let rx = live::spawn_feed(
        state.store.clone(),
        session_id,
        state.settings.poll_interval,
    );

    let stream = stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        let sse_event = Event::default().json_data(&event).ok()?;
        Some((Ok::<Event, Infallible>(sse_event), rx))
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}
