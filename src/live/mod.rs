//! Live update feed.
//!
//! Gives a connected client incremental visibility into notes and the
//! rolling summary while chunks are still being processed. The feed polls
//! the store on a fixed interval and diffs against what it has already
//! delivered: at-least-once per note append and per distinct summary value,
//! note order preserved, latency bounded by the poll interval.
//!
//! Ownership is checked once by the caller at connection open; the feed
//! itself is read-only against the store.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::store::SessionStore;

/// Default poll cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// One pushed update. The `type` discriminator distinguishes the variants
/// on the wire.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedEvent {
    /// A newly persisted note.
    Note { id: String, content: String },
    /// The rolling summary changed value.
    Summary { content: String },
}

/// Spawn a poll loop for one session and return the event receiver.
///
/// The loop polls once immediately, then on every interval tick. It stops —
/// closing the channel — when the receiver is dropped or a store read
/// fails; reconnecting is the client's responsibility.
pub fn spawn_feed(
    store: Arc<dyn SessionStore>,
    session_id: String,
    interval: Duration,
) -> mpsc::Receiver<FeedEvent> {
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let mut delivered = 0usize;
        let mut last_summary = String::new();
        let mut ticker = tokio::time::interval(interval);

        loop {
            // First tick completes immediately, giving the connection an
            // initial snapshot before the steady cadence.
            ticker.tick().await;

            let notes = match store.notes_for_session(&session_id).await {
                Ok(notes) => notes,
                Err(e) => {
                    warn!(session_id = %session_id, "feed poll failed, closing: {}", e);
                    return;
                }
            };

            if notes.len() > delivered {
                for note in &notes[delivered..] {
                    let event = FeedEvent::Note {
                        id: note.id.clone(),
                        content: note.content.clone(),
                    };
                    if tx.send(event).await.is_err() {
                        debug!(session_id = %session_id, "feed receiver dropped");
                        return;
                    }
                }
                delivered = notes.len();
            }

            let latest_summary = notes
                .last()
                .map(|n| n.rolling_summary.clone())
                .unwrap_or_default();
            if !latest_summary.is_empty() && latest_summary != last_summary {
                let event = FeedEvent::Summary {
                    content: latest_summary.clone(),
                };
                if tx.send(event).await.is_err() {
                    debug!(session_id = %session_id, "feed receiver dropped");
                    return;
                }
                last_summary = latest_summary;
            }
        }
    });

    rx
}
