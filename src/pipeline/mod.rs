//! The chunked transcription pipeline.
//!
//! One chunk flows: transcribe → persist chunk → gather bounded prior
//! context → generate notes + rolling summary → persist note. Sessions
//! close through the [`Finalizer`]; whole files run end to end through the
//! [`UploadPipeline`].

mod finalize;
mod processor;
pub mod prompts;
mod upload;

pub use finalize::Finalizer;
pub use processor::{ChunkOutcome, ChunkProcessor, ChunkRequest};
pub use upload::{UploadConfig, UploadOutcome, UploadPipeline};
