pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod inference;
pub mod live;
pub mod notify;
pub mod pipeline;
pub mod store;

pub use audio::{
    AudioFrame, AudioPiece, AudioSegment, LiveSegmenter, SegmenterConfig, SplitStrategy,
};
pub use config::Config;
pub use error::Error;
pub use http::{create_router, AppSettings, AppState};
pub use inference::{Completer, InferenceConfig, OpenAiClient, Transcriber};
pub use live::FeedEvent;
pub use pipeline::{
    ChunkOutcome, ChunkProcessor, ChunkRequest, Finalizer, UploadConfig, UploadOutcome,
    UploadPipeline,
};
pub use store::{
    authorize, Chunk, MemoryStore, NewChunk, NewNote, NewSession, Note, Profile, Session,
    SessionPatch, SessionStatus, SessionStore,
};
