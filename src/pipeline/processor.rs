use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::prompts;
use crate::error::{Error, Result};
use crate::inference::{Completer, Transcriber};
use crate::store::{NewChunk, NewNote, Profile, SessionPatch, SessionStore};

/// Input for one chunk-processing invocation.
#[derive(Debug, Clone)]
pub struct ChunkRequest {
    pub session_id: String,
    /// Caller-assigned sequence number, unique within the session.
    pub seq: u32,
    pub audio: Vec<u8>,
    pub filename: String,
    pub profile: Profile,
    pub duration_seconds: u32,
}

/// Result of one chunk-processing invocation. All fields are empty when
/// transcription yielded nothing usable (silent no-op).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkOutcome {
    pub transcript: String,
    pub notes: String,
    pub rolling_summary: String,
    pub chunk_id: String,
}

impl ChunkOutcome {
    pub fn is_empty(&self) -> bool {
        self.chunk_id.is_empty()
    }
}

/// Structured output contract for note generation. `notes` may arrive as a
/// list of items or a pre-joined string.
#[derive(Debug, Deserialize)]
struct NotesPayload {
    notes: Option<NotesField>,
    #[serde(rename = "rollingSummary")]
    rolling_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NotesField {
    Items(Vec<String>),
    Text(String),
}

impl NotesField {
    fn into_bulleted(self) -> String {
        match self {
            NotesField::Items(items) => items
                .iter()
                .map(|item| format!("• {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
            NotesField::Text(text) => text,
        }
    }
}

/// Turns one audio piece into a persisted chunk and a persisted note,
/// maintaining a bounded window of temporal context.
///
/// The steps are strictly sequential: the context read depends on this
/// chunk's write, and note generation depends on the context. Concurrency,
/// if any, comes from the caller issuing multiple invocations at once.
pub struct ChunkProcessor {
    store: Arc<dyn SessionStore>,
    transcriber: Arc<dyn Transcriber>,
    completer: Arc<dyn Completer>,
}

impl ChunkProcessor {
    pub fn new(
        store: Arc<dyn SessionStore>,
        transcriber: Arc<dyn Transcriber>,
        completer: Arc<dyn Completer>,
    ) -> Self {
        Self {
            store,
            transcriber,
            completer,
        }
    }

    pub async fn process(&self, request: ChunkRequest) -> Result<ChunkOutcome> {
        // 1. Transcribe. A transcription error persists nothing.
        let transcript = self
            .transcriber
            .transcribe(&request.audio, &request.filename)
            .await?;

        if transcript.is_empty() {
            info!(
                session_id = %request.session_id,
                seq = request.seq,
                "transcription yielded no usable text, skipping chunk"
            );
            return Ok(ChunkOutcome::default());
        }

        // 2. Persist the chunk.
        let chunk = self
            .store
            .create_chunk(NewChunk {
                session_id: request.session_id.clone(),
                seq: request.seq,
                transcript: transcript.clone(),
                duration_seconds: request.duration_seconds,
            })
            .await?;

        // 3. Prior context: all previously persisted transcripts, minus the
        //    chunk just written. The prompt builder bounds this to the two
        //    most recent regardless of session length.
        let previous: Vec<String> = self
            .store
            .chunks_for_session(&request.session_id)
            .await?
            .into_iter()
            .filter(|c| c.id != chunk.id)
            .map(|c| c.transcript)
            .collect();

        // 4. Generate notes and the rolling summary.
        let (notes, rolling_summary) = self
            .generate_notes(&transcript, request.profile, &previous)
            .await?;

        // 5. Persist the note, weakly referencing the chunk.
        self.store
            .create_note(NewNote {
                session_id: request.session_id.clone(),
                chunk_id: Some(chunk.id.clone()),
                content: notes.clone(),
                rolling_summary: rolling_summary.clone(),
            })
            .await?;

        // 6. Touch the session timestamp. Non-critical.
        if let Err(e) = self
            .store
            .update_session(&request.session_id, SessionPatch::default())
            .await
        {
            warn!(session_id = %request.session_id, "failed to touch session: {}", e);
        }

        info!(
            session_id = %request.session_id,
            seq = request.seq,
            chunk_id = %chunk.id,
            "chunk processed"
        );

        Ok(ChunkOutcome {
            transcript,
            notes,
            rolling_summary,
            chunk_id: chunk.id,
        })
    }

    async fn generate_notes(
        &self,
        transcript: &str,
        profile: Profile,
        previous: &[String],
    ) -> Result<(String, String)> {
        let system = prompts::notes_system_prompt(profile);
        let user = prompts::notes_user_message(transcript, previous);

        let raw = self.completer.complete(&system, &user, true).await?;

        let payload: NotesPayload = serde_json::from_str(&raw)
            .map_err(|e| Error::SummarizationFailed(format!("malformed notes JSON: {}", e)))?;

        if payload.notes.is_none() && payload.rolling_summary.is_none() {
            return Err(Error::SummarizationFailed(
                "notes response carries neither notes nor rollingSummary".to_string(),
            ));
        }

        let notes = payload
            .notes
            .map(NotesField::into_bulleted)
            .unwrap_or_default();
        let rolling_summary = payload.rolling_summary.unwrap_or_default();

        Ok((notes, rolling_summary))
    }
}
