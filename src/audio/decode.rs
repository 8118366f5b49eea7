use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::info;

use super::splitter::AudioPiece;
use super::wav::encode_wav_mono16;
use crate::error::{Error, Result};

/// Raw decoded audio: interleaved f32 samples plus stream parameters.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

/// Decode a compressed audio buffer into raw interleaved samples.
///
/// The container format is probed from the data itself; the extension hint
/// only speeds up probing. Any probe or codec failure maps to
/// [`Error::DecodeFailed`] with nothing persisted.
pub fn decode_samples(bytes: Vec<u8>, extension_hint: Option<&str>) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::DecodeFailed(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::DecodeFailed("no decodable audio track".to_string()))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::DecodeFailed(e.to_string()))?;

    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(Error::DecodeFailed(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();

                if sample_buf.is_none() {
                    sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            // Skip over malformed packets; the rest of the stream is still usable.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(Error::DecodeFailed(e.to_string())),
        }
    }

    if sample_rate == 0 || channels == 0 || samples.is_empty() {
        return Err(Error::DecodeFailed("stream produced no audio".to_string()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Mix interleaved samples down to mono by averaging all channels.
pub fn mix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample via linear interpolation between neighboring samples.
///
/// Identity when the rates match. Output length is `round(len / ratio)`
/// where `ratio = from_rate / to_rate`.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio).round() as usize;
    let mut out = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = samples.get(idx).copied().unwrap_or(0.0);
        let b = samples.get(idx + 1).copied().unwrap_or(0.0);
        out.push(a + frac * (b - a));
    }

    out
}

/// Slice mono samples into fixed-duration windows; the last window may be
/// shorter.
pub fn window_samples(samples: &[f32], sample_rate: u32, window_secs: u32) -> Vec<Vec<f32>> {
    let window_len = (sample_rate as usize).saturating_mul(window_secs as usize).max(1);
    samples
        .chunks(window_len)
        .map(|w| w.to_vec())
        .collect()
}

/// The decode-and-re-encode split strategy: decode to raw samples, mix to
/// mono, resample to `target_rate`, slice into `window_secs` windows, and
/// re-encode each window as an independently valid WAV file.
pub fn split_decoded(
    bytes: Vec<u8>,
    original_filename: &str,
    target_rate: u32,
    window_secs: u32,
) -> Result<Vec<AudioPiece>> {
    let ext = original_filename.rsplit('.').next();
    let decoded = decode_samples(bytes, ext)?;

    info!(
        "Decoded {}: {} Hz, {} channels, {} samples",
        original_filename,
        decoded.sample_rate,
        decoded.channels,
        decoded.samples.len()
    );

    let mono = mix_to_mono(&decoded.samples, decoded.channels);
    let resampled = resample_linear(&mono, decoded.sample_rate, target_rate);
    let windows = window_samples(&resampled, target_rate, window_secs);
    let total = windows.len();

    let mut pieces = Vec::with_capacity(total);
    for (index, window) in windows.into_iter().enumerate() {
        let duration_seconds = (window.len() as f64 / target_rate as f64).ceil() as u32;
        let data = encode_wav_mono16(&window, target_rate)
            .map_err(|e| Error::DecodeFailed(e.to_string()))?;
        pieces.push(AudioPiece {
            data,
            index,
            total_pieces: total,
            filename: format!("piece-{}.wav", index),
            duration_seconds,
        });
    }

    Ok(pieces)
}
