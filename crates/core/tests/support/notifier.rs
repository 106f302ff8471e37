//! Recording notifier double for dispatch tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docket_core::Notifier;
use docket_domain::{DocketError, Result as DomainResult};
use uuid::Uuid;

/// One captured dispatch.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub subject: String,
    pub html_body: String,
    pub recipients: Vec<Uuid>,
}

/// Notifier that records every dispatch and can be told to fail.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Everything dispatched so far.
    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Make every subsequent `notify` call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        subject: &str,
        html_body: &str,
        recipients: &[Uuid],
    ) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DocketError::Notification("transport unavailable".into()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            recipients: recipients.to_vec(),
        });
        Ok(())
    }
}
