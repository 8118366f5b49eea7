use thiserror::Error;

/// Failure taxonomy for the processing core.
///
/// Handlers map these onto HTTP statuses; everything below the HTTP layer
/// returns `Result<_, Error>` and lets the caller decide what is fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller does not own the referenced session.
    #[error("not authorized to access session {0}")]
    Unauthorized(String),

    /// Session (or other entity) does not exist.
    #[error("session {0} not found")]
    NotFound(String),

    /// Input rejected before any remote call was attempted.
    #[error("payload of {size} bytes exceeds the {limit} byte ceiling")]
    PayloadTooLarge { size: usize, limit: usize },

    /// The transcription capability errored.
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    /// The summarization capability errored or returned malformed output.
    #[error("summarization failed: {0}")]
    SummarizationFailed(String),

    /// Client-supplied audio could not be decoded. Retryable; nothing persisted.
    #[error("audio decode failed: {0}")]
    DecodeFailed(String),

    /// Persistence failure.
    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
