// Tests for the byte-slicing split strategy.
//
// These verify the size ceiling, the single-piece fast path, and that
// slicing is a pure partition: payloads concatenate back to the original
// buffer exactly.

use anyhow::Result;
use voxnotes::audio::{mime_for_filename, split_bytes, MAX_INPUT_BYTES, MAX_PIECE_BYTES};
use voxnotes::Error;

const MIB: usize = 1024 * 1024;

fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_small_buffer_is_a_single_piece() -> Result<()> {
    let buffer = patterned(10 * MIB);

    let pieces = split_bytes(&buffer, "meeting.webm")?;

    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].index, 0);
    assert_eq!(pieces[0].total_pieces, 1);
    assert_eq!(pieces[0].data, buffer, "single piece should equal the input");
    assert_eq!(
        pieces[0].filename, "meeting.webm",
        "single piece keeps the original filename"
    );

    Ok(())
}

#[test]
fn test_45_mib_buffer_splits_into_three_pieces() -> Result<()> {
    let buffer = patterned(45 * MIB);

    let pieces = split_bytes(&buffer, "standup.mp3")?;

    assert_eq!(pieces.len(), 3, "45 MiB over a 20 MiB ceiling is 3 pieces");
    for (i, piece) in pieces.iter().enumerate() {
        assert_eq!(piece.index, i);
        assert_eq!(piece.total_pieces, 3);
        assert!(piece.data.len() <= MAX_PIECE_BYTES);
        assert_eq!(piece.filename, format!("piece-{}.mp3", i));
    }

    // Round-trip identity: the pieces partition the buffer exactly.
    let rejoined: Vec<u8> = pieces.iter().flat_map(|p| p.data.clone()).collect();
    assert_eq!(rejoined, buffer);

    Ok(())
}

#[test]
fn test_buffer_over_ceiling_is_rejected() {
    let buffer = vec![0u8; MAX_INPUT_BYTES + 1];

    let err = split_bytes(&buffer, "huge.webm").unwrap_err();

    match err {
        Error::PayloadTooLarge { size, limit } => {
            assert_eq!(size, MAX_INPUT_BYTES + 1);
            assert_eq!(limit, MAX_INPUT_BYTES);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other),
    }
}

#[test]
fn test_boundary_sizes() -> Result<()> {
    // Exactly at the piece ceiling: still a single piece.
    let at_ceiling = patterned(MAX_PIECE_BYTES);
    assert_eq!(split_bytes(&at_ceiling, "a.wav")?.len(), 1);

    // One byte over: two pieces, the second carrying a single byte.
    let over = patterned(MAX_PIECE_BYTES + 1);
    let pieces = split_bytes(&over, "a.wav")?;
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].data.len(), MAX_PIECE_BYTES);
    assert_eq!(pieces[1].data.len(), 1);

    Ok(())
}

#[test]
fn test_filename_without_extension_falls_back_to_webm() -> Result<()> {
    let buffer = patterned(MAX_PIECE_BYTES + 1);

    let pieces = split_bytes(&buffer, "recording")?;

    assert_eq!(pieces[0].filename, "piece-0.webm");

    Ok(())
}

#[test]
fn test_mime_lookup() {
    assert_eq!(mime_for_filename("a.mp3"), "audio/mpeg");
    assert_eq!(mime_for_filename("a.m4a"), "audio/mp4");
    assert_eq!(mime_for_filename("a.wav"), "audio/wav");
    assert_eq!(mime_for_filename("a.flac"), "audio/flac");
    assert_eq!(mime_for_filename("a.unknown"), "audio/webm");
    assert_eq!(mime_for_filename("noextension"), "audio/webm");
}
