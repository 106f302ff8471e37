//! Notifier adapter that records dispatches in the log stream.

use async_trait::async_trait;
use docket_core::Notifier;
use docket_domain::Result;
use tracing::info;
use uuid::Uuid;

/// Logs every dispatch instead of delivering it.
///
/// Stands in where the hosting platform injects its real transport; also
/// useful for driving the scheduler in development without an email gateway.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, subject: &str, _html_body: &str, recipients: &[Uuid]) -> Result<()> {
        info!(subject, recipient_count = recipients.len(), "notification dispatched");
        Ok(())
    }
}
