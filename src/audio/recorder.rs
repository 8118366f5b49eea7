use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use super::wav::encode_wav_pcm16;

/// Raw audio samples as delivered by a capture layer (16-bit PCM,
/// interleaved).
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Milliseconds since capture started.
    pub timestamp_ms: u64,
}

/// Configuration for live-recording segmentation.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Wall-clock length of each flushed segment (default: 20 seconds).
    pub segment_secs: u64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self { segment_secs: 20 }
    }
}

/// One flushed segment of a live recording: a complete, independently
/// decodable WAV file ready to submit as a chunk.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Encoded WAV bytes.
    pub wav: Vec<u8>,
    /// Monotonically increasing, zero-based segment number — used as the
    /// chunk sequence number on submission.
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_count: usize,
}

impl AudioSegment {
    pub fn duration_seconds(&self) -> u32 {
        ((self.end_ms.saturating_sub(self.start_ms)) as f64 / 1000.0).ceil() as u32
    }
}

/// Splits a live recording into fixed-interval segments.
///
/// Receives audio frames from a capture layer and flushes a completed WAV
/// segment every `segment_secs` of recorded time — the in-memory equivalent
/// of stopping and immediately restarting capture.
pub struct LiveSegmenter {
    config: SegmenterConfig,
    current: Option<SegmentBuffer>,
    next_index: usize,
}

impl LiveSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            current: None,
            next_index: 0,
        }
    }

    /// Consume frames until the channel closes, sending each completed
    /// segment to `out` as soon as it flushes. Returns the total number of
    /// segments produced.
    pub async fn run(
        &mut self,
        mut audio_rx: mpsc::Receiver<AudioFrame>,
        out: mpsc::Sender<AudioSegment>,
    ) -> Result<usize> {
        info!(
            "Live segmenter started ({}s segments)",
            self.config.segment_secs
        );

        let mut produced = 0;

        while let Some(frame) = audio_rx.recv().await {
            if self.should_flush(&frame) {
                if let Some(buffer) = self.current.take() {
                    let segment = buffer.finish()?;
                    info!(
                        "Segment {} flushed: {:.1}s - {:.1}s ({} samples)",
                        segment.index,
                        segment.start_ms as f64 / 1000.0,
                        segment.end_ms as f64 / 1000.0,
                        segment.sample_count
                    );
                    produced += 1;
                    if out.send(segment).await.is_err() {
                        // Receiver gone; stop capturing.
                        return Ok(produced);
                    }
                }
                self.current = Some(self.start_segment(&frame));
            }

            if let Some(buffer) = &mut self.current {
                buffer.push_frame(&frame);
            }
        }

        // Flush the final partial segment.
        if let Some(buffer) = self.current.take() {
            let segment = buffer.finish()?;
            info!(
                "Final segment {} flushed ({} samples)",
                segment.index, segment.sample_count
            );
            produced += 1;
            let _ = out.send(segment).await;
        }

        info!("Live segmenter finished: {} segments", produced);

        Ok(produced)
    }

    fn should_flush(&self, frame: &AudioFrame) -> bool {
        match &self.current {
            None => true,
            Some(buffer) => {
                let elapsed_ms = frame.timestamp_ms.saturating_sub(buffer.start_ms);
                elapsed_ms >= self.config.segment_secs * 1000
            }
        }
    }

    fn start_segment(&mut self, frame: &AudioFrame) -> SegmentBuffer {
        let buffer = SegmentBuffer {
            index: self.next_index,
            start_ms: frame.timestamp_ms,
            end_ms: frame.timestamp_ms,
            sample_rate: frame.sample_rate,
            channels: frame.channels,
            samples: Vec::new(),
        };
        self.next_index += 1;
        buffer
    }
}

/// Accumulates frames for one segment until it is flushed.
struct SegmentBuffer {
    index: usize,
    start_ms: u64,
    end_ms: u64,
    sample_rate: u32,
    channels: u16,
    samples: Vec<i16>,
}

impl SegmentBuffer {
    fn push_frame(&mut self, frame: &AudioFrame) {
        self.samples.extend_from_slice(&frame.samples);
        self.end_ms = frame.timestamp_ms;
    }

    fn finish(self) -> Result<AudioSegment> {
        let wav = encode_wav_pcm16(&self.samples, self.sample_rate, self.channels)
            .context("Failed to encode segment as WAV")?;

        Ok(AudioSegment {
            wav,
            index: self.index,
            start_ms: self.start_ms,
            end_ms: self.end_ms,
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_count: self.samples.len(),
        })
    }
}
