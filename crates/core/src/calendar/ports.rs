//! Port interfaces for calendar persistence
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docket_domain::{CalendarEvent, CalendarReminder, EventFilter, Result};
use uuid::Uuid;

/// Trait for persisting calendar events
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event row.
    async fn insert(&self, event: &CalendarEvent) -> Result<()>;

    /// Load an event by id.
    async fn find(&self, id: Uuid) -> Result<Option<CalendarEvent>>;

    /// List a tenant's events matching the filter, ordered by start
    /// ascending.
    async fn list(&self, tenant_id: Uuid, filter: &EventFilter) -> Result<Vec<CalendarEvent>>;

    /// All occurrences generated from a template.
    async fn children_of(&self, template_id: Uuid) -> Result<Vec<CalendarEvent>>;

    /// Persist the full state of an already-stored event.
    async fn update(&self, event: &CalendarEvent) -> Result<()>;

    /// Delete a single event row. Cascades are orchestrated by the service.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Trait for persisting reminders
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Insert a new reminder row.
    async fn insert(&self, reminder: &CalendarReminder) -> Result<()>;

    /// Load a reminder by id.
    async fn find(&self, id: Uuid) -> Result<Option<CalendarReminder>>;

    /// All reminders owned by an event.
    async fn for_event(&self, event_id: Uuid) -> Result<Vec<CalendarReminder>>;

    /// Every pending, never-sent reminder joined to its owning event.
    async fn pending_with_events(&self) -> Result<Vec<(CalendarReminder, CalendarEvent)>>;

    /// Drop all reminders owned by an event. Returns the number removed.
    async fn delete_for_event(&self, event_id: Uuid) -> Result<usize>;

    /// Transition a reminder to sent, stamping `sent_at`.
    ///
    /// Must be atomic with respect to concurrent scans: only a reminder that
    /// is still pending with a null `sent_at` transitions, and the return
    /// value says whether this call won. This is the at-most-once dispatch
    /// guarantee.
    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<bool>;
}
