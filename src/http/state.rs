use std::sync::Arc;
use std::time::Duration;

use crate::inference::{Completer, Transcriber};
use crate::live::DEFAULT_POLL_INTERVAL;
use crate::notify::{LogNotifier, SummaryNotifier};
use crate::pipeline::UploadConfig;
use crate::store::SessionStore;

/// Request-independent settings handlers need.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    /// Absolute upload ceiling; requests above it are rejected.
    pub max_input_bytes: usize,
    /// Live feed poll cadence.
    pub poll_interval: Duration,
    /// Decode-strategy audio parameters.
    pub upload: UploadConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_input_bytes: crate::audio::MAX_INPUT_BYTES,
            poll_interval: DEFAULT_POLL_INTERVAL,
            upload: UploadConfig::default(),
        }
    }
}

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub completer: Arc<dyn Completer>,
    pub notifier: Arc<dyn SummaryNotifier>,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        transcriber: Arc<dyn Transcriber>,
        completer: Arc<dyn Completer>,
        settings: AppSettings,
    ) -> Self {
        Self {
            store,
            transcriber,
            completer,
            notifier: Arc::new(LogNotifier),
            settings,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn SummaryNotifier>) -> Self {
        self.notifier = notifier;
        self
    }
}
