//! Notification port interface
//!
//! Delivery transports (email, SMS, in-app) live outside this crate; the
//! core only builds subjects and bodies and hands them across this boundary.
//! Resolving recipient ids to actual delivery addresses is the adapter's
//! responsibility.

use async_trait::async_trait;
use docket_domain::Result;
use uuid::Uuid;

/// Trait for delivering a rendered notification to a set of recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message to every recipient.
    async fn notify(&self, subject: &str, html_body: &str, recipients: &[Uuid]) -> Result<()>;
}
