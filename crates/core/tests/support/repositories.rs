//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic unit tests without database dependencies.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docket_core::{DeadlineRepository, EventRepository, ReminderRepository};
use docket_domain::{
    CalendarEvent, CalendarReminder, DeadlineFilter, EventFilter, LegalDeadline, ReminderStatus,
    Result as DomainResult,
};
use uuid::Uuid;

/// In-memory mock for `EventRepository`.
#[derive(Default, Clone)]
pub struct MockEventRepository {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
}

impl MockEventRepository {
    /// All stored rows, for post-hoc assertions.
    pub fn rows(&self) -> Vec<CalendarEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<CalendarEvent> {
        self.events.lock().unwrap().iter().find(|e| e.id == id).cloned()
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn insert(&self, event: &CalendarEvent) -> DomainResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<CalendarEvent>> {
        Ok(self.get(id))
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        filter: &EventFilter,
    ) -> DomainResult<Vec<CalendarEvent>> {
        let mut rows: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.tenant_id == tenant_id && filter.matches(e))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.start);
        Ok(rows)
    }

    async fn children_of(&self, template_id: Uuid) -> DomainResult<Vec<CalendarEvent>> {
        let mut rows: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind.parent_id() == Some(template_id))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.start);
        Ok(rows)
    }

    async fn update(&self, event: &CalendarEvent) -> DomainResult<()> {
        let mut rows = self.events.lock().unwrap();
        if let Some(slot) = rows.iter_mut().find(|e| e.id == event.id) {
            *slot = event.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.events.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }
}

/// In-memory mock for `ReminderRepository`.
///
/// Holds a handle to the event mock so `pending_with_events` can perform the
/// same join the SQL implementation does.
#[derive(Clone)]
pub struct MockReminderRepository {
    reminders: Arc<Mutex<Vec<CalendarReminder>>>,
    events: MockEventRepository,
}

impl MockReminderRepository {
    pub fn new(events: MockEventRepository) -> Self {
        Self { reminders: Arc::new(Mutex::new(Vec::new())), events }
    }

    /// All stored rows, for post-hoc assertions.
    pub fn rows(&self) -> Vec<CalendarReminder> {
        self.reminders.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReminderRepository for MockReminderRepository {
    async fn insert(&self, reminder: &CalendarReminder) -> DomainResult<()> {
        self.reminders.lock().unwrap().push(reminder.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<CalendarReminder>> {
        Ok(self.reminders.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn for_event(&self, event_id: Uuid) -> DomainResult<Vec<CalendarReminder>> {
        Ok(self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn pending_with_events(
        &self,
    ) -> DomainResult<Vec<(CalendarReminder, CalendarEvent)>> {
        let pending: Vec<_> = self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == ReminderStatus::Pending && r.sent_at.is_none())
            .cloned()
            .collect();

        let mut joined = Vec::with_capacity(pending.len());
        for reminder in pending {
            if let Some(event) = self.events.get(reminder.event_id) {
                joined.push((reminder, event));
            }
        }
        Ok(joined)
    }

    async fn delete_for_event(&self, event_id: Uuid) -> DomainResult<usize> {
        let mut rows = self.reminders.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.event_id != event_id);
        Ok(before - rows.len())
    }

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> DomainResult<bool> {
        let mut rows = self.reminders.lock().unwrap();
        match rows
            .iter_mut()
            .find(|r| r.id == id && r.status == ReminderStatus::Pending && r.sent_at.is_none())
        {
            Some(reminder) => {
                reminder.status = ReminderStatus::Sent;
                reminder.sent_at = Some(sent_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory mock for `DeadlineRepository`.
#[derive(Default, Clone)]
pub struct MockDeadlineRepository {
    deadlines: Arc<Mutex<Vec<LegalDeadline>>>,
}

impl MockDeadlineRepository {
    /// All stored rows, for post-hoc assertions.
    pub fn rows(&self) -> Vec<LegalDeadline> {
        self.deadlines.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeadlineRepository for MockDeadlineRepository {
    async fn insert(&self, deadline: &LegalDeadline) -> DomainResult<()> {
        self.deadlines.lock().unwrap().push(deadline.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<LegalDeadline>> {
        Ok(self.deadlines.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        filter: &DeadlineFilter,
    ) -> DomainResult<Vec<LegalDeadline>> {
        let mut rows: Vec<_> = self
            .deadlines
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.tenant_id == tenant_id && filter.matches(d))
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.due_date);
        Ok(rows)
    }

    async fn update(&self, deadline: &LegalDeadline) -> DomainResult<()> {
        let mut rows = self.deadlines.lock().unwrap();
        if let Some(slot) = rows.iter_mut().find(|d| d.id == deadline.id) {
            *slot = deadline.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.deadlines.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }
}
