//! External inference capabilities.
//!
//! The core treats transcription and summarization as black boxes: given
//! audio bytes return text, given instructions return a completion. The
//! traits here are the only surface the pipeline depends on; [`OpenAiClient`]
//! is the production implementation, and tests substitute their own.

mod openai;

pub use openai::{InferenceConfig, OpenAiClient};

use crate::error::Result;

/// Speech-to-text capability.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio payload. Returns trimmed text; an empty string
    /// means the audio contained nothing usable and is not an error.
    ///
    /// Implementations must tolerate partial container fragments — the
    /// byte-slicing split strategy produces pieces that do not align with
    /// container frame boundaries.
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String>;
}

/// Text completion capability.
#[async_trait::async_trait]
pub trait Completer: Send + Sync {
    /// Run one completion. With `json_mode` the response is guaranteed to be
    /// syntactically valid JSON (the caller still validates the fields).
    async fn complete(&self, system: &str, user: &str, json_mode: bool) -> Result<String>;
}
