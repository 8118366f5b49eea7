use std::io::Cursor;

use anyhow::{Context, Result};

/// Encode f32 samples as a mono 16-bit PCM WAV file in memory.
///
/// Samples are clamped to [-1, 1] before conversion so that clipping in the
/// source material cannot wrap around.
pub fn encode_wav_mono16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer")?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let value = if clamped < 0.0 {
                (clamped * 0x8000 as f32) as i16
            } else {
                (clamped * 0x7FFF as f32) as i16
            };
            writer.write_sample(value).context("Failed to write sample")?;
        }
        writer.finalize().context("Failed to finalize WAV data")?;
    }

    Ok(cursor.into_inner())
}

/// Encode i16 samples (any channel count) as a WAV file in memory.
pub fn encode_wav_pcm16(
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer")?;
        for &sample in samples {
            writer.write_sample(sample).context("Failed to write sample")?;
        }
        writer.finalize().context("Failed to finalize WAV data")?;
    }

    Ok(cursor.into_inner())
}
