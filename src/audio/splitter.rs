use crate::error::{Error, Result};

/// Per-piece ceiling: 20 MiB leaves headroom under the transcription
/// service's 25 MB payload limit.
pub const MAX_PIECE_BYTES: usize = 20 * 1024 * 1024;

/// Absolute input ceiling. Anything larger is rejected before any remote
/// call is attempted.
pub const MAX_INPUT_BYTES: usize = 200 * 1024 * 1024;

/// One bounded-size unit of audio ready to submit for transcription.
#[derive(Debug, Clone)]
pub struct AudioPiece {
    pub data: Vec<u8>,
    /// Zero-based position within the split.
    pub index: usize,
    /// Total piece count, resolved once splitting completes.
    pub total_pieces: usize,
    /// Synthesized filename preserving the original extension.
    pub filename: String,
    /// Known duration in seconds, when the split strategy can compute one.
    pub duration_seconds: u32,
}

/// Split a raw byte buffer into fixed-size pieces without decoding.
///
/// This is a purely mechanical slice: pieces do not respect container frame
/// boundaries, and correctness relies on the transcription service
/// tolerating partial container fragments. A buffer at or below the
/// per-piece ceiling is returned unchanged as a single piece.
pub fn split_bytes(buffer: &[u8], original_filename: &str) -> Result<Vec<AudioPiece>> {
    if buffer.len() > MAX_INPUT_BYTES {
        return Err(Error::PayloadTooLarge {
            size: buffer.len(),
            limit: MAX_INPUT_BYTES,
        });
    }

    if buffer.len() <= MAX_PIECE_BYTES {
        return Ok(vec![AudioPiece {
            data: buffer.to_vec(),
            index: 0,
            total_pieces: 1,
            filename: original_filename.to_string(),
            duration_seconds: 0,
        }]);
    }

    let ext = extension_of(original_filename);
    let mut pieces = Vec::new();
    let mut offset = 0;

    while offset < buffer.len() {
        let end = (offset + MAX_PIECE_BYTES).min(buffer.len());
        pieces.push(AudioPiece {
            data: buffer[offset..end].to_vec(),
            index: pieces.len(),
            total_pieces: 0, // filled in below
            filename: format!("piece-{}.{}", pieces.len(), ext),
            duration_seconds: 0,
        });
        offset = end;
    }

    let total = pieces.len();
    for piece in &mut pieces {
        piece.total_pieces = total;
    }

    Ok(pieces)
}

fn extension_of(filename: &str) -> &str {
    filename.rsplit('.').next().filter(|e| *e != filename).unwrap_or("webm")
}

/// MIME type for a known audio extension, defaulting to `audio/webm`.
pub fn mime_for_filename(filename: &str) -> &'static str {
    match extension_of(filename).to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "mp4" | "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "audio/webm",
    }
}
