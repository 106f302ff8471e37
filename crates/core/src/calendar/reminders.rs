//! Reminder derivation and dispatch - core business logic

use std::sync::Arc;

use chrono::Utc;
use docket_domain::constants::REMINDER_SUBJECT_PREFIX;
use docket_domain::{
    format_datetime, time_until, CalendarEvent, CalendarReminder, Channel, Result,
};
use tracing::{debug, warn};

use super::ports::ReminderRepository;
use crate::notify_ports::Notifier;

/// Derives reminder rows from event configuration and dispatches the due
/// ones through the notification port.
pub struct ReminderService {
    reminders: Arc<dyn ReminderRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ReminderService {
    /// Create a new reminder service
    pub fn new(reminders: Arc<dyn ReminderRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { reminders, notifier }
    }

    /// Materialize one pending reminder per configured offset.
    ///
    /// No-op unless the event has reminders enabled and at least one offset.
    /// Every reminder starts on the default channel with the event's
    /// assignees as recipients.
    pub async fn setup_event_reminders(
        &self,
        event: &CalendarEvent,
    ) -> Result<Vec<CalendarReminder>> {
        if !event.wants_reminders() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut created = Vec::with_capacity(event.reminder_minutes.len());
        for &minutes_before in &event.reminder_minutes {
            let reminder = CalendarReminder::pending(
                event.tenant_id,
                event.id,
                Default::default(),
                minutes_before,
                event.assigned_to.clone(),
                now,
            )?;
            self.reminders.insert(&reminder).await?;
            created.push(reminder);
        }

        debug!(event_id = %event.id, count = created.len(), "registered event reminders");
        Ok(created)
    }

    /// Register reminders only when the event has none yet.
    ///
    /// Used by occurrence expansion, where the template's reminders were
    /// deferred at creation time and re-expansion must not duplicate them.
    pub async fn ensure_event_reminders(
        &self,
        event: &CalendarEvent,
    ) -> Result<Vec<CalendarReminder>> {
        if !event.wants_reminders() {
            return Ok(Vec::new());
        }
        if !self.reminders.for_event(event.id).await?.is_empty() {
            return Ok(Vec::new());
        }
        self.setup_event_reminders(event).await
    }

    /// Drop every reminder owned by an event.
    pub async fn clear_event_reminders(&self, event_id: uuid::Uuid) -> Result<usize> {
        self.reminders.delete_for_event(event_id).await
    }

    /// Invalidate and regenerate an event's reminders from its current state.
    pub async fn refresh_event_reminders(
        &self,
        event: &CalendarEvent,
    ) -> Result<Vec<CalendarReminder>> {
        self.clear_event_reminders(event.id).await?;
        self.setup_event_reminders(event).await
    }

    /// Scan pending reminders and dispatch every one whose moment has come.
    ///
    /// Each invocation is independent: already-sent reminders never enter the
    /// scan because of the pending/null-`sent_at` filter, and the repository's
    /// compare-and-set `mark_sent` resolves races between overlapping scans.
    /// A reminder whose dispatch fails stays pending and is retried on the
    /// next tick. Returns the number of reminders sent.
    pub async fn process_due_reminders(&self) -> Result<usize> {
        let now = Utc::now();
        let pending = self.reminders.pending_with_events().await?;

        let mut sent = 0;
        for (reminder, event) in pending {
            if !reminder.is_due(event.start, now) {
                continue;
            }

            if let Err(err) = self.dispatch(&reminder, &event).await {
                warn!(
                    reminder_id = %reminder.id,
                    event_id = %event.id,
                    error = %err,
                    "reminder dispatch failed; will retry on next scan"
                );
                continue;
            }

            if self.reminders.mark_sent(reminder.id, Utc::now()).await? {
                sent += 1;
            } else {
                // A concurrent scan already claimed this reminder.
                debug!(reminder_id = %reminder.id, "reminder already marked sent");
            }
        }

        if sent > 0 {
            debug!(sent, "dispatched due reminders");
        }
        Ok(sent)
    }

    /// Render and route one reminder through its configured channels.
    async fn dispatch(&self, reminder: &CalendarReminder, event: &CalendarEvent) -> Result<()> {
        let now = Utc::now();
        let subject = format!(
            "{REMINDER_SUBJECT_PREFIX}: {} - {} from now",
            event.title,
            time_until(event.start, now)
        );
        let body = render_body(event);

        for channel in reminder.channel.channels() {
            match channel {
                Channel::Email => {
                    self.notifier
                        .notify(&subject, &body, &reminder.recipients)
                        .await?;
                }
                // SMS and in-app delivery are not wired yet; the channel is
                // representable so rows routed there survive until they are.
                Channel::Sms => {
                    debug!(reminder_id = %reminder.id, "sms channel not wired; skipping");
                }
                Channel::InApp => {
                    debug!(reminder_id = %reminder.id, "in-app channel not wired; skipping");
                }
            }
        }
        Ok(())
    }
}

fn render_body(event: &CalendarEvent) -> String {
    let mut body = format!(
        "<h2>{}</h2>\n<p><strong>When:</strong> {}</p>",
        event.title,
        format_datetime(event.start)
    );
    if let Some(location) = &event.location {
        body.push_str(&format!("\n<p><strong>Where:</strong> {location}</p>"));
    }
    if let Some(description) = &event.description {
        body.push_str(&format!("\n<p>{description}</p>"));
    }
    body
}
