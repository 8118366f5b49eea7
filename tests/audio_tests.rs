// Tests for the decode split strategy building blocks: WAV encoding,
// mono mixdown, linear resampling, windowing, and the composed
// decode-and-re-encode path.

use std::io::Cursor;

use anyhow::Result;
use voxnotes::audio::{
    decode_samples, encode_wav_mono16, encode_wav_pcm16, mix_to_mono, resample_linear,
    split_decoded, window_samples,
};
use voxnotes::Error;

#[test]
fn test_wav_encode_round_trips_through_hound() -> Result<()> {
    let samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0];

    let wav = encode_wav_mono16(&samples, 16_000)?;

    let reader = hound::WavReader::new(Cursor::new(wav))?;
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.bits_per_sample, 16);

    let decoded: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;
    assert_eq!(decoded.len(), samples.len());
    assert_eq!(decoded[0], 0);
    assert_eq!(decoded[3], i16::MAX);
    assert_eq!(decoded[4], i16::MIN);

    Ok(())
}

#[test]
fn test_wav_encode_clamps_out_of_range_samples() -> Result<()> {
    let wav = encode_wav_mono16(&[2.0, -3.0], 16_000)?;

    let reader = hound::WavReader::new(Cursor::new(wav))?;
    let decoded: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;

    assert_eq!(decoded, vec![i16::MAX, i16::MIN]);

    Ok(())
}

#[test]
fn test_mono_mixdown_averages_channels() {
    // Two channels, interleaved: L=0.2/R=0.4 then L=-0.6/R=0.2
    let interleaved = vec![0.2, 0.4, -0.6, 0.2];

    let mono = mix_to_mono(&interleaved, 2);

    assert_eq!(mono.len(), 2);
    assert!((mono[0] - 0.3).abs() < 1e-6);
    assert!((mono[1] - (-0.2)).abs() < 1e-6);

    // Already mono: untouched.
    assert_eq!(mix_to_mono(&[0.1, 0.2], 1), vec![0.1, 0.2]);
}

#[test]
fn test_linear_resampling_halves_the_sample_count() {
    let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();

    let resampled = resample_linear(&samples, 32_000, 16_000);

    assert_eq!(resampled.len(), 500);
}

#[test]
fn test_resampling_preserves_constant_signals() {
    let samples = vec![0.25f32; 4410];

    let resampled = resample_linear(&samples, 44_100, 16_000);

    assert!(!resampled.is_empty());
    for &s in &resampled {
        assert!((s - 0.25).abs() < 1e-4, "constant stays constant, got {}", s);
    }
}

#[test]
fn test_resampling_is_identity_at_equal_rates() {
    let samples = vec![0.1, 0.2, 0.3];
    assert_eq!(resample_linear(&samples, 16_000, 16_000), samples);
}

#[test]
fn test_windowing_boundaries() {
    // 10 Hz, 2 s windows: 25 samples become 20 + 5.
    let samples: Vec<f32> = (0..25).map(|i| i as f32).collect();

    let windows = window_samples(&samples, 10, 2);

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].len(), 20);
    assert_eq!(windows[1].len(), 5);

    // Windows partition the input in order.
    let rejoined: Vec<f32> = windows.into_iter().flatten().collect();
    assert_eq!(rejoined, samples);
}

#[test]
fn test_split_decoded_produces_valid_wav_windows() -> Result<()> {
    // 2.5 seconds of a 440-ish tone at 32 kHz stereo, encoded as WAV.
    let rate = 32_000u32;
    let frames = (rate as usize) * 5 / 2;
    let mut interleaved = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let v = ((i as f32 * 0.09).sin() * 0.5 * i16::MAX as f32) as i16;
        interleaved.push(v);
        interleaved.push(v);
    }
    let source = encode_wav_pcm16(&interleaved, rate, 2)?;

    // 1-second windows at 16 kHz: expect 3 pieces (1 s, 1 s, 0.5 s).
    let pieces = split_decoded(source, "tone.wav", 16_000, 1)?;

    assert_eq!(pieces.len(), 3);
    for (i, piece) in pieces.iter().enumerate() {
        assert_eq!(piece.index, i);
        assert_eq!(piece.total_pieces, 3);
        assert_eq!(piece.filename, format!("piece-{}.wav", i));

        // Every window is an independently valid, decodable WAV.
        let reader = hound::WavReader::new(Cursor::new(piece.data.clone()))?;
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
    }

    assert_eq!(pieces[0].duration_seconds, 1);
    assert_eq!(pieces[1].duration_seconds, 1);
    assert_eq!(pieces[2].duration_seconds, 1, "partial window rounds up");

    // Total decoded length survives the mixdown and resample.
    let total_samples: usize = pieces
        .iter()
        .map(|p| {
            hound::WavReader::new(Cursor::new(p.data.clone()))
                .map(|r| r.len() as usize)
                .unwrap_or(0)
        })
        .sum();
    let expected = (16_000 * 5 / 2) as isize;
    assert!(
        (total_samples as isize - expected).abs() <= 2,
        "expected about {} samples, got {}",
        expected,
        total_samples
    );

    Ok(())
}

#[test]
fn test_split_decoded_rejects_garbage() {
    let err = split_decoded(vec![0xAB; 2048], "junk.mp3", 16_000, 600).unwrap_err();
    assert!(matches!(err, Error::DecodeFailed(_)), "got {:?}", err);
}
