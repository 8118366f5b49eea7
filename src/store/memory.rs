use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{
    Chunk, NewChunk, NewNote, NewSession, Note, Session, SessionPatch, SessionStatus,
};
use super::SessionStore;
use crate::error::{Error, Result};

/// In-memory store backed by a `RwLock`.
///
/// Good enough for tests and single-process deployments; a relational
/// backend slots in behind the same trait. Chunks and notes are kept in
/// insertion order so that "creation order" reads are stable even when two
/// writes land on the same timestamp.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    chunks: Vec<Chunk>,
    notes: Vec<Note>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Allowed status moves. `Completed -> Completed` is permitted so that
/// re-finalization can overwrite the final summary; terminal states are
/// otherwise locked.
fn transition_allowed(from: SessionStatus, to: SessionStatus) -> bool {
    matches!(
        (from, to),
        (SessionStatus::Active, _) | (SessionStatus::Completed, SessionStatus::Completed)
    )
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, new: NewSession) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: new.owner_id,
            name: new.name,
            profile: new.profile,
            status: SessionStatus::Active,
            final_summary: None,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id.clone(), session.clone());
        debug!(session_id = %session.id, "session created");

        Ok(session)
    }

    async fn session(&self, id: &str) -> Result<Option<Session>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(id).cloned())
    }

    async fn sessions_for_owner(&self, owner_id: &str) -> Result<Vec<Session>> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<Session> = inner
            .sessions
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn update_session(&self, id: &str, patch: SessionPatch) -> Result<Session> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if let Some(status) = patch.status {
            if !transition_allowed(session.status, status) {
                return Err(Error::Store(format!(
                    "invalid status transition {:?} -> {:?} for session {}",
                    session.status, status, id
                )));
            }
            session.status = status;
        }
        if let Some(name) = patch.name {
            session.name = name;
        }
        if let Some(summary) = patch.final_summary {
            session.final_summary = Some(summary);
        }
        session.updated_at = Utc::now();

        Ok(session.clone())
    }

    async fn create_chunk(&self, new: NewChunk) -> Result<Chunk> {
        let mut inner = self.inner.write().await;

        if !inner.sessions.contains_key(&new.session_id) {
            return Err(Error::NotFound(new.session_id));
        }
        if inner
            .chunks
            .iter()
            .any(|c| c.session_id == new.session_id && c.seq == new.seq)
        {
            return Err(Error::Store(format!(
                "sequence number {} already used in session {}",
                new.seq, new.session_id
            )));
        }

        let chunk = Chunk {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: new.session_id,
            seq: new.seq,
            transcript: new.transcript,
            duration_seconds: new.duration_seconds,
            created_at: Utc::now(),
        };
        inner.chunks.push(chunk.clone());

        Ok(chunk)
    }

    async fn create_note(&self, new: NewNote) -> Result<Note> {
        let mut inner = self.inner.write().await;

        if !inner.sessions.contains_key(&new.session_id) {
            return Err(Error::NotFound(new.session_id));
        }

        let note = Note {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: new.session_id,
            chunk_id: new.chunk_id,
            content: new.content,
            rolling_summary: new.rolling_summary,
            created_at: Utc::now(),
        };
        inner.notes.push(note.clone());

        Ok(note)
    }

    async fn chunks_for_session(&self, session_id: &str) -> Result<Vec<Chunk>> {
        let inner = self.inner.read().await;
        let mut chunks: Vec<Chunk> = inner
            .chunks
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect();
        chunks.sort_by_key(|c| c.seq);
        Ok(chunks)
    }

    async fn notes_for_session(&self, session_id: &str) -> Result<Vec<Note>> {
        let inner = self.inner.read().await;
        Ok(inner
            .notes
            .iter()
            .filter(|n| n.session_id == session_id)
            .cloned()
            .collect())
    }
}
