//! Legal deadline tracking - core business logic
//!
//! A deadline optionally owns a mirrored calendar event. The mirror is
//! one-directional (deadline → event) and the two rows are not covered by a
//! transaction, so every mirror write is logged with enough context to
//! reconcile by hand if a step fails partway.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use docket_domain::constants::{APPROACHING_WINDOW_DAYS, FILING_DEADLINE_EVENT_TYPE};
use docket_domain::{
    jurisdiction_due_date, CalendarEvent, DeadlineFilter, DeadlinePatch, DeadlineStatus,
    DocketError, EventKind, EventPatch, JurisdictionRule, LegalDeadline, NewCalendarEvent,
    NewLegalDeadline, Result,
};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use super::ports::DeadlineRepository;
use crate::calendar::events::CalendarEventService;

/// Deadline tracker: lifecycle plus calendar mirroring.
pub struct DeadlineService {
    deadlines: Arc<dyn DeadlineRepository>,
    events: Arc<CalendarEventService>,
}

impl DeadlineService {
    /// Create a new deadline service
    pub fn new(deadlines: Arc<dyn DeadlineRepository>, events: Arc<CalendarEventService>) -> Self {
        Self { deadlines, events }
    }

    /// Insert a deadline, creating its mirrored calendar event unless the
    /// caller supplied one. The returned deadline always carries a
    /// `related_event_id`.
    #[instrument(skip(self, data), fields(tenant_id = %data.tenant_id))]
    pub async fn create_deadline(&self, data: NewLegalDeadline) -> Result<LegalDeadline> {
        let mut deadline = LegalDeadline::from_new(data.clone(), Utc::now())?;
        self.deadlines.insert(&deadline).await?;

        if deadline.related_event_id.is_none() {
            let mirror = self.create_mirror_event(&data, &deadline).await?;
            deadline.related_event_id = Some(mirror.id);
            deadline.updated_at = Utc::now();
            if let Err(err) = self.deadlines.update(&deadline).await {
                error!(
                    deadline_id = %deadline.id,
                    event_id = %mirror.id,
                    error = %err,
                    "failed to back-fill mirrored event id onto deadline"
                );
                return Err(err);
            }
        }

        debug!(deadline_id = %deadline.id, "created deadline");
        Ok(deadline)
    }

    /// Apply a partial update, propagating the mapped fields onto the
    /// mirrored event. The event write is skipped entirely when no mapped
    /// field is present in the patch.
    #[instrument(skip(self, patch))]
    pub async fn update_deadline(&self, id: Uuid, patch: DeadlinePatch) -> Result<LegalDeadline> {
        patch.validate()?;

        let mut deadline = self.get_deadline(id).await?;
        patch.apply(&mut deadline, Utc::now());
        self.deadlines.update(&deadline).await?;

        if let Some(event_id) = deadline.related_event_id {
            if patch.touches_mirror() {
                let event_patch = EventPatch {
                    title: patch.title.clone(),
                    description: patch.description.clone(),
                    start: patch.due_date,
                    priority: patch.priority,
                    assigned_to: patch.assigned_to.clone(),
                    status: patch.status.map(DeadlineStatus::mirrored_event_status),
                    ..Default::default()
                };
                if let Err(err) = self.events.update_event(event_id, event_patch).await {
                    error!(
                        deadline_id = %id,
                        event_id = %event_id,
                        error = %err,
                        "failed to propagate deadline update onto mirrored event"
                    );
                    return Err(err);
                }
            }
        }

        Ok(deadline)
    }

    /// Delete a deadline and its mirrored event (reminders included).
    #[instrument(skip(self))]
    pub async fn delete_deadline(&self, id: Uuid) -> Result<()> {
        let deadline = self.get_deadline(id).await?;

        if let Some(event_id) = deadline.related_event_id {
            match self.events.delete_event(event_id).await {
                Ok(()) => {}
                // A mirror deleted out-of-band must not strand the deadline.
                Err(DocketError::NotFound(_)) => {
                    warn!(deadline_id = %id, event_id = %event_id, "mirrored event already gone");
                }
                Err(err) => {
                    error!(
                        deadline_id = %id,
                        event_id = %event_id,
                        error = %err,
                        "failed to cascade delete mirrored event"
                    );
                    return Err(err);
                }
            }
        }

        self.deadlines.delete(id).await
    }

    /// Mark a deadline completed, stamping `completed_at`/`completed_by`
    /// exactly once and reflecting the status onto the mirrored event.
    #[instrument(skip(self))]
    pub async fn complete_deadline(&self, id: Uuid, user_id: Uuid) -> Result<LegalDeadline> {
        let mut deadline = self.get_deadline(id).await?;
        if deadline.completed_at.is_some() {
            return Ok(deadline);
        }

        let now = Utc::now();
        deadline.status = DeadlineStatus::Completed;
        deadline.completed_at = Some(now);
        deadline.completed_by = Some(user_id);
        deadline.updated_at = now;
        self.deadlines.update(&deadline).await?;

        if let Some(event_id) = deadline.related_event_id {
            let patch = EventPatch {
                status: Some(DeadlineStatus::Completed.mirrored_event_status()),
                ..Default::default()
            };
            if let Err(err) = self.events.update_event(event_id, patch).await {
                error!(
                    deadline_id = %id,
                    event_id = %event_id,
                    error = %err,
                    "failed to complete mirrored event"
                );
                return Err(err);
            }
        }

        Ok(deadline)
    }

    /// Load a deadline, failing with `NotFound` when absent.
    pub async fn get_deadline(&self, id: Uuid) -> Result<LegalDeadline> {
        self.deadlines
            .find(id)
            .await?
            .ok_or_else(|| DocketError::not_found("deadline", id))
    }

    /// A tenant's deadlines matching the filter, ordered by due date.
    pub async fn list_deadlines(
        &self,
        tenant_id: Uuid,
        filter: &DeadlineFilter,
    ) -> Result<Vec<LegalDeadline>> {
        self.deadlines.list(tenant_id, filter).await
    }

    /// Open deadlines due within the next seven days.
    pub async fn approaching_deadlines(&self, tenant_id: Uuid) -> Result<Vec<LegalDeadline>> {
        let now = Utc::now();
        let filter = DeadlineFilter {
            due_from: Some(now),
            due_until: Some(now + Duration::days(APPROACHING_WINDOW_DAYS)),
            ..Default::default()
        };
        let mut deadlines = self.deadlines.list(tenant_id, &filter).await?;
        deadlines.retain(|d| d.status.is_open());
        Ok(deadlines)
    }

    /// Open deadlines whose due date has passed.
    pub async fn overdue_deadlines(&self, tenant_id: Uuid) -> Result<Vec<LegalDeadline>> {
        let filter = DeadlineFilter { due_until: Some(Utc::now()), ..Default::default() };
        let mut deadlines = self.deadlines.list(tenant_id, &filter).await?;
        deadlines.retain(|d| d.status.is_open());
        Ok(deadlines)
    }

    /// Derive a due date from a base date under a jurisdiction rule.
    pub fn calculate_due_date(
        &self,
        base: DateTime<Utc>,
        rule: &JurisdictionRule,
    ) -> DateTime<Utc> {
        jurisdiction_due_date(base, rule)
    }

    async fn create_mirror_event(
        &self,
        data: &NewLegalDeadline,
        deadline: &LegalDeadline,
    ) -> Result<CalendarEvent> {
        let mirror = NewCalendarEvent {
            tenant_id: deadline.tenant_id,
            created_by: deadline.created_by,
            title: deadline.title.clone(),
            description: deadline.description.clone(),
            location: None,
            start: deadline.due_date,
            end: None,
            all_day: true,
            event_type: FILING_DEADLINE_EVENT_TYPE.to_string(),
            priority: deadline.priority,
            matter_id: deadline.matter_id,
            client_id: None,
            assigned_to: deadline.assigned_to.clone(),
            kind: EventKind::Single,
            reminders_enabled: data.reminders_enabled,
            reminder_minutes: Vec::new(),
            show_in_client_portal: data.show_in_client_portal,
        };

        match self.events.create_event(mirror).await {
            Ok(event) => Ok(event),
            Err(err) => {
                error!(
                    deadline_id = %deadline.id,
                    error = %err,
                    "failed to create mirrored event for deadline"
                );
                Err(err)
            }
        }
    }
}
