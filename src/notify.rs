use tracing::info;

/// Outbound notification once a final summary exists.
///
/// Delivery is best effort and out of band: the HTTP layer calls this after
/// a successful finalization and ignores failures. Real transports (email,
/// webhooks) implement this trait outside the core.
#[async_trait::async_trait]
pub trait SummaryNotifier: Send + Sync {
    async fn summary_ready(&self, owner_id: &str, session_name: &str, summary: &str);
}

/// Default notifier: records the event in the log and nothing else.
pub struct LogNotifier;

#[async_trait::async_trait]
impl SummaryNotifier for LogNotifier {
    async fn summary_ready(&self, owner_id: &str, session_name: &str, summary: &str) {
        info!(
            owner_id = %owner_id,
            session = %session_name,
            summary_len = summary.len(),
            "final summary ready"
        );
    }
}
