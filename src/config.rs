use anyhow::Result;
use serde::Deserialize;

use crate::inference::InferenceConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub live: LiveConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Absolute input ceiling for uploads, in bytes.
    pub max_input_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Target rate for the decode split strategy (the rate the
    /// transcription model uses internally).
    pub sample_rate: u32,
    /// Window length for decoded uploads, in seconds.
    pub window_secs: u32,
    /// Flush interval for live-recording segmentation, in seconds.
    pub segment_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    pub poll_interval_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "voxnotes".to_string(),
            http: HttpConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: crate::audio::MAX_INPUT_BYTES,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            window_secs: 600,
            segment_secs: 20,
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1500,
        }
    }
}

impl Config {
    /// Load from a config file plus `VOXNOTES__`-prefixed environment
    /// overrides (e.g. `VOXNOTES__SERVICE__HTTP__PORT`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("VOXNOTES")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
