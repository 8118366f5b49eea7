use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use super::finalize::Finalizer;
use super::processor::{ChunkProcessor, ChunkRequest};
use crate::audio::{split_bytes, split_decoded, AudioPiece, SplitStrategy};
use crate::error::Result;
use crate::inference::{Completer, Transcriber};
use crate::store::{NewSession, Profile, SessionStore};

/// Audio parameters for the decode split strategy.
#[derive(Debug, Clone, Copy)]
pub struct UploadConfig {
    pub target_sample_rate: u32,
    pub window_secs: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16_000,
            window_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub session_id: String,
    pub piece_count: usize,
}

/// The whole-file pipeline: create a session, split the buffer, process
/// every piece in order, then finalize — one call end to end.
pub struct UploadPipeline {
    store: Arc<dyn SessionStore>,
    processor: ChunkProcessor,
    finalizer: Finalizer,
    config: UploadConfig,
}

impl UploadPipeline {
    pub fn new(
        store: Arc<dyn SessionStore>,
        transcriber: Arc<dyn Transcriber>,
        completer: Arc<dyn Completer>,
        config: UploadConfig,
    ) -> Self {
        let processor = ChunkProcessor::new(store.clone(), transcriber.clone(), completer.clone());
        let finalizer = Finalizer::new(store.clone(), completer);
        Self {
            store,
            processor,
            finalizer,
            config,
        }
    }

    /// Run the pipeline. Any error after session creation marks the session
    /// failed (best effort) and propagates — the session stays visible in
    /// listings with its terminal status.
    pub async fn run(
        &self,
        owner_id: &str,
        name: &str,
        profile: Profile,
        bytes: &[u8],
        filename: &str,
        strategy: SplitStrategy,
    ) -> Result<UploadOutcome> {
        let session = self
            .store
            .create_session(NewSession {
                owner_id: owner_id.to_string(),
                name: name.to_string(),
                profile,
            })
            .await?;

        info!(
            session_id = %session.id,
            bytes = bytes.len(),
            ?strategy,
            "upload pipeline started"
        );

        match self
            .run_inner(&session.id, profile, bytes, filename, strategy)
            .await
        {
            Ok(piece_count) => Ok(UploadOutcome {
                session_id: session.id,
                piece_count,
            }),
            Err(e) => {
                error!(session_id = %session.id, "upload pipeline failed: {}", e);
                if let Err(mark) = self.finalizer.fail(&session.id).await {
                    error!(session_id = %session.id, "failed to mark session failed: {}", mark);
                }
                Err(e)
            }
        }
    }

    async fn run_inner(
        &self,
        session_id: &str,
        profile: Profile,
        bytes: &[u8],
        filename: &str,
        strategy: SplitStrategy,
    ) -> Result<usize> {
        // Splitting fails fast (size ceiling, undecodable input) before any
        // transcription call is attempted.
        let pieces: Vec<AudioPiece> = match strategy {
            SplitStrategy::ByteSlice => split_bytes(bytes, filename)?,
            SplitStrategy::Decode => split_decoded(
                bytes.to_vec(),
                filename,
                self.config.target_sample_rate,
                self.config.window_secs,
            )?,
        };
        let piece_count = pieces.len();

        for piece in pieces {
            self.processor
                .process(ChunkRequest {
                    session_id: session_id.to_string(),
                    seq: piece.index as u32,
                    audio: piece.data,
                    filename: piece.filename,
                    profile,
                    duration_seconds: piece.duration_seconds,
                })
                .await?;
        }

        self.finalizer.finalize(session_id, profile).await?;

        Ok(piece_count)
    }
}
