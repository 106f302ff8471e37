//! Calendar event lifecycle - core business logic

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use docket_domain::constants::MAX_OCCURRENCE_EXPANSION;
use docket_domain::{
    CalendarEvent, DocketError, EventFilter, EventKind, EventPatch, EventStatus, NewCalendarEvent,
    Result,
};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::ports::EventRepository;
use super::reminders::ReminderService;

/// Calendar event store: CRUD plus recurrence expansion.
pub struct CalendarEventService {
    events: Arc<dyn EventRepository>,
    reminders: Arc<ReminderService>,
}

impl CalendarEventService {
    /// Create a new calendar event service
    pub fn new(events: Arc<dyn EventRepository>, reminders: Arc<ReminderService>) -> Self {
        Self { events, reminders }
    }

    /// Insert one event.
    ///
    /// A recurring event with no parent becomes a series template; its
    /// reminders are not materialized here (occurrence expansion owns that).
    /// Non-recurring events get their reminders registered synchronously.
    #[instrument(skip(self, data), fields(tenant_id = %data.tenant_id))]
    pub async fn create_event(&self, data: NewCalendarEvent) -> Result<CalendarEvent> {
        let event = CalendarEvent::from_new(data, Utc::now())?;
        self.events.insert(&event).await?;

        if !event.kind.is_template() {
            self.reminders.setup_event_reminders(&event).await?;
        }

        debug!(event_id = %event.id, template = event.kind.is_template(), "created event");
        Ok(event)
    }

    /// Expand a template into its first `count` concrete occurrences.
    ///
    /// Callers without an opinion pass
    /// [`docket_domain::constants::DEFAULT_OCCURRENCE_EXPANSION`]; requests
    /// beyond [`MAX_OCCURRENCE_EXPANSION`] are clamped.
    ///
    /// The template's own start is position 0 of the sequence and is skipped;
    /// dates already represented among existing children (exact timestamp
    /// match) are skipped too, so re-invocation never duplicates. Returns
    /// only the newly created occurrences.
    #[instrument(skip(self))]
    pub async fn expand_template(
        &self,
        template_id: Uuid,
        count: usize,
    ) -> Result<Vec<CalendarEvent>> {
        let template = self
            .events
            .find(template_id)
            .await?
            .ok_or_else(|| DocketError::not_found("event", template_id))?;

        let (pattern, until) = match &template.kind {
            EventKind::Template { pattern, until } => (pattern.clone(), *until),
            _ => return Err(DocketError::not_found("recurring template", template_id)),
        };

        let existing: HashSet<_> = self
            .events
            .children_of(template_id)
            .await?
            .into_iter()
            .map(|child| child.start)
            .collect();

        // The template is position 0 of the series; its own reminders were
        // deferred at creation time and are materialized here, once.
        if template.wants_reminders() {
            self.reminders.ensure_event_reminders(&template).await?;
        }

        let duration = template.duration();
        let now = Utc::now();
        let count = count.min(MAX_OCCURRENCE_EXPANSION);

        let mut created = Vec::new();
        for start in pattern.occurrences(template.start, count, until).skip(1) {
            if existing.contains(&start) {
                continue;
            }

            let child = CalendarEvent {
                id: Uuid::now_v7(),
                start,
                end: duration.map(|d| start + d),
                status: EventStatus::Pending,
                kind: EventKind::Occurrence { parent_id: template.id },
                created_at: now,
                updated_at: now,
                ..template.clone()
            };
            self.events.insert(&child).await?;

            if template.wants_reminders() {
                self.reminders.setup_event_reminders(&child).await?;
            }
            created.push(child);
        }

        debug!(template_id = %template_id, created = created.len(), "expanded recurring template");
        Ok(created)
    }

    /// Load an event, failing with `NotFound` when absent.
    pub async fn get_event(&self, id: Uuid) -> Result<CalendarEvent> {
        self.events
            .find(id)
            .await?
            .ok_or_else(|| DocketError::not_found("event", id))
    }

    /// A tenant's events matching the filter, ordered by start ascending.
    pub async fn list_events(
        &self,
        tenant_id: Uuid,
        filter: &EventFilter,
    ) -> Result<Vec<CalendarEvent>> {
        self.events.list(tenant_id, filter).await
    }

    /// Apply a partial update.
    ///
    /// Touching any reminder-relevant field (enabled flag, offsets, start)
    /// drops the event's reminders and regenerates them from the resulting
    /// state.
    #[instrument(skip(self, patch))]
    pub async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<CalendarEvent> {
        patch.validate()?;

        let mut event = self.get_event(id).await?;
        patch.apply(&mut event, Utc::now());
        self.events.update(&event).await?;

        if patch.touches_reminders() {
            self.reminders.refresh_event_reminders(&event).await?;
        }

        Ok(event)
    }

    /// Delete an event and everything hanging off it.
    ///
    /// Deleting a series template cascades to all of its occurrences and
    /// their reminders first.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid) -> Result<()> {
        let event = self.get_event(id).await?;

        if event.kind.is_template() {
            for child in self.events.children_of(id).await? {
                if let Err(err) = self.delete_single(child.id).await {
                    error!(
                        template_id = %id,
                        child_id = %child.id,
                        error = %err,
                        "cascade delete of occurrence failed"
                    );
                    return Err(err);
                }
            }
        }

        self.delete_single(id).await
    }

    async fn delete_single(&self, id: Uuid) -> Result<()> {
        self.reminders.clear_event_reminders(id).await?;
        self.events.delete(id).await
    }
}
