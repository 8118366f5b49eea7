use std::sync::Arc;

use tracing::info;

use super::prompts;
use crate::error::Result;
use crate::inference::Completer;
use crate::store::{Profile, Session, SessionPatch, SessionStatus, SessionStore};

/// Closes out sessions: one consolidated summary over all transcripts in
/// chunk order, replacing the per-chunk rolling summary.
pub struct Finalizer {
    store: Arc<dyn SessionStore>,
    completer: Arc<dyn Completer>,
}

impl Finalizer {
    pub fn new(store: Arc<dyn SessionStore>, completer: Arc<dyn Completer>) -> Self {
        Self { store, completer }
    }

    /// Assemble all non-empty transcripts in sequence order and request one
    /// consolidated summary — the full concatenation, not a window.
    ///
    /// Zero usable transcripts is a legitimate terminal state: the session
    /// completes with an empty summary. Finalizing an already-completed
    /// session recomputes and overwrites; finalizing a failed session is
    /// rejected by the store's transition guard.
    pub async fn finalize(&self, session_id: &str, profile: Profile) -> Result<Session> {
        let chunks = self.store.chunks_for_session(session_id).await?;
        let transcripts: Vec<String> = chunks.into_iter().map(|c| c.transcript).collect();
        let usable = prompts::sanitize_parts(&transcripts);

        let final_summary = if usable.is_empty() {
            String::new()
        } else {
            let system = prompts::final_summary_system_prompt(profile);
            let user = usable.join("\n\n");
            self.completer
                .complete(&system, &user, false)
                .await?
                .trim()
                .to_string()
        };

        let session = self
            .store
            .update_session(
                session_id,
                SessionPatch {
                    status: Some(SessionStatus::Completed),
                    final_summary: Some(final_summary),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            session_id = %session_id,
            transcripts = usable.len(),
            "session finalized"
        );

        Ok(session)
    }

    /// Mark a session failed. Terminal; not reversible by the core.
    pub async fn fail(&self, session_id: &str) -> Result<Session> {
        self.store
            .update_session(
                session_id,
                SessionPatch {
                    status: Some(SessionStatus::Failed),
                    ..Default::default()
                },
            )
            .await
    }
}
