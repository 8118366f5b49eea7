//! Durable state for sessions, chunks and notes.
//!
//! The store is data-access only: it orders and guards writes but knows
//! nothing about callers. Ownership is checked by [`authorize`] on the way
//! in, once per operation (or once per connection for the live feed).

mod memory;
mod models;

pub use memory::MemoryStore;
pub use models::{
    Chunk, NewChunk, NewNote, NewSession, Note, Profile, Session, SessionPatch, SessionStatus,
};

use crate::error::{Error, Result};

/// Storage operations the pipeline needs.
///
/// Implementations must keep chunks ordered by sequence number and notes in
/// creation order, and must reject invalid status transitions and duplicate
/// `(session, seq)` pairs. See [`MemoryStore`] for the reference behavior.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, new: NewSession) -> Result<Session>;

    async fn session(&self, id: &str) -> Result<Option<Session>>;

    /// All sessions owned by `owner_id`, newest first.
    async fn sessions_for_owner(&self, owner_id: &str) -> Result<Vec<Session>>;

    /// Apply a patch and touch `updated_at`. Errors if the session does not
    /// exist or the patch would leave a terminal state.
    async fn update_session(&self, id: &str, patch: SessionPatch) -> Result<Session>;

    /// Errors if the sequence number is already used within the session.
    async fn create_chunk(&self, new: NewChunk) -> Result<Chunk>;

    async fn create_note(&self, new: NewNote) -> Result<Note>;

    /// Chunks for a session, ordered by sequence number ascending.
    async fn chunks_for_session(&self, session_id: &str) -> Result<Vec<Chunk>>;

    /// Notes for a session, in creation order.
    async fn notes_for_session(&self, session_id: &str) -> Result<Vec<Note>>;
}

/// Fetch a session and verify the caller owns it.
///
/// Missing session maps to `NotFound`, owner mismatch to `Unauthorized`.
pub async fn authorize(
    store: &dyn SessionStore,
    session_id: &str,
    owner_id: &str,
) -> Result<Session> {
    let session = store
        .session(session_id)
        .await?
        .ok_or_else(|| Error::NotFound(session_id.to_string()))?;

    if session.owner_id != owner_id {
        return Err(Error::Unauthorized(session_id.to_string()));
    }

    Ok(session)
}
