//! Audio partitioning: three strategies for producing bounded-size pieces.
//!
//! - `splitter` — mechanical byte slicing for whole files that must be
//!   split without decoding
//! - `decode` — decode, mix to mono, resample and re-encode fixed-duration
//!   WAV windows
//! - `recorder` — fixed-interval segment flushing for live capture

pub mod decode;
pub mod recorder;
pub mod splitter;
pub mod wav;

use serde::{Deserialize, Serialize};

pub use decode::{
    decode_samples, mix_to_mono, resample_linear, split_decoded, window_samples, DecodedAudio,
};
pub use recorder::{AudioFrame, AudioSegment, LiveSegmenter, SegmenterConfig};
pub use splitter::{mime_for_filename, split_bytes, AudioPiece, MAX_INPUT_BYTES, MAX_PIECE_BYTES};
pub use wav::{encode_wav_mono16, encode_wav_pcm16};

/// How an uploaded file is partitioned into pieces.
///
/// The two strategies coexist deliberately: byte slicing is cheap and
/// container-agnostic but produces fragment boundaries the transcription
/// service must tolerate; decoding always yields valid audio but costs a
/// full decode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    #[default]
    ByteSlice,
    Decode,
}
