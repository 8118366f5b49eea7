use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content template selecting the fixed instruction text for note generation
/// and final summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Meeting,
    Lecture,
    Interview,
    Freeform,
}

/// Session lifecycle state. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Failed,
}

/// One recording or upload effort and its aggregate results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub profile: Profile,
    pub status: SessionStatus,
    /// Consolidated summary, set on transition to `Completed`.
    pub final_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One transcribed audio segment. Append-only; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub session_id: String,
    /// Caller-assigned sequence number, unique within the session.
    pub seq: u32,
    /// May be empty when transcription yielded nothing usable.
    pub transcript: String,
    pub duration_seconds: u32,
    pub created_at: DateTime<Utc>,
}

/// Structured notes plus rolling summary derived from one chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub session_id: String,
    /// Weak reference to the source chunk: lookup/ordering only, never
    /// ownership. A note stands alone if the chunk is gone.
    pub chunk_id: Option<String>,
    pub content: String,
    /// Cumulative summary as of this note.
    pub rolling_summary: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for session creation. Id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub owner_id: String,
    pub name: String,
    pub profile: Profile,
}

#[derive(Debug, Clone)]
pub struct NewChunk {
    pub session_id: String,
    pub seq: u32,
    pub transcript: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub session_id: String,
    pub chunk_id: Option<String>,
    pub content: String,
    pub rolling_summary: String,
}

/// Partial session update. `None` fields are left untouched; the store
/// touches `updated_at` on every patch, including an empty one.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub name: Option<String>,
    pub status: Option<SessionStatus>,
    pub final_summary: Option<String>,
}
