//! Calendar event model types
//!
//! A recurring event is stored as a *template*; the concrete dates generated
//! from it are *occurrences* pointing back at the template. The distinction is
//! an enum rather than a pair of nullable columns so that the compiler forces
//! every consumer to handle both shapes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Priority;
use crate::errors::{DocketError, Result};
use crate::impl_status_conversions;
use crate::utils::recurrence::RecurrencePattern;

/// Lifecycle status of a calendar event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    Completed,
    Cancelled,
    Rescheduled,
}

impl_status_conversions!(EventStatus {
    Pending => "pending",
    Completed => "completed",
    Cancelled => "cancelled",
    Rescheduled => "rescheduled",
});

impl Default for EventStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Recurrence role of an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// A plain, non-recurring event.
    Single,
    /// A recurring series template. Occurrences are generated from it.
    Template {
        pattern: RecurrencePattern,
        until: Option<DateTime<Utc>>,
    },
    /// A generated member of a series. Never carries its own pattern.
    Occurrence { parent_id: Uuid },
}

impl EventKind {
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        match self {
            Self::Occurrence { parent_id } => Some(*parent_id),
            _ => None,
        }
    }
}

/// A calendar entry owned by one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    /// Free-form classification tag, e.g. "court_date" or "filing_deadline".
    pub event_type: String,
    pub priority: Priority,
    pub status: EventStatus,
    pub matter_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub assigned_to: Vec<Uuid>,
    pub kind: EventKind,
    pub reminders_enabled: bool,
    /// Minutes-before-start offsets, one reminder per entry.
    pub reminder_minutes: Vec<i64>,
    pub show_in_client_portal: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Build a validated event from caller input.
    pub fn from_new(data: NewCalendarEvent, now: DateTime<Utc>) -> Result<Self> {
        data.validate()?;
        Ok(Self {
            id: Uuid::now_v7(),
            tenant_id: data.tenant_id,
            created_by: data.created_by,
            title: data.title,
            description: data.description,
            location: data.location,
            start: data.start,
            end: data.end,
            all_day: data.all_day,
            event_type: data.event_type,
            priority: data.priority,
            status: EventStatus::Pending,
            matter_id: data.matter_id,
            client_id: data.client_id,
            assigned_to: data.assigned_to,
            kind: data.kind,
            reminders_enabled: data.reminders_enabled,
            reminder_minutes: data.reminder_minutes,
            show_in_client_portal: data.show_in_client_portal,
            created_at: now,
            updated_at: now,
        })
    }

    /// Template end-to-start span, projected onto generated occurrences.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }

    /// True when reminders should actually be materialized.
    pub fn wants_reminders(&self) -> bool {
        self.reminders_enabled && !self.reminder_minutes.is_empty()
    }
}

/// Caller input for event creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub tenant_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    pub event_type: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub matter_id: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
    #[serde(default = "default_event_kind")]
    pub kind: EventKind,
    #[serde(default)]
    pub reminders_enabled: bool,
    #[serde(default)]
    pub reminder_minutes: Vec<i64>,
    #[serde(default)]
    pub show_in_client_portal: bool,
}

fn default_event_kind() -> EventKind {
    EventKind::Single
}

impl NewCalendarEvent {
    /// Shape/range checks on caller-supplied fields.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DocketError::Validation("event title must not be empty".into()));
        }
        if let Some(end) = self.end {
            if end < self.start {
                return Err(DocketError::Validation(
                    "event end must not precede its start".into(),
                ));
            }
        }
        if self.reminder_minutes.iter().any(|m| *m < 0) {
            return Err(DocketError::Validation(
                "reminder offsets must be non-negative minutes".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update for an event. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub event_type: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<EventStatus>,
    pub matter_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub assigned_to: Option<Vec<Uuid>>,
    pub reminders_enabled: Option<bool>,
    pub reminder_minutes: Option<Vec<i64>>,
    pub show_in_client_portal: Option<bool>,
}

impl EventPatch {
    /// A change to any of these fields invalidates existing reminders.
    pub fn touches_reminders(&self) -> bool {
        self.reminders_enabled.is_some()
            || self.reminder_minutes.is_some()
            || self.start.is_some()
    }

    /// Shape/range checks on the provided fields.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(DocketError::Validation("event title must not be empty".into()));
            }
        }
        if let Some(minutes) = &self.reminder_minutes {
            if minutes.iter().any(|m| *m < 0) {
                return Err(DocketError::Validation(
                    "reminder offsets must be non-negative minutes".into(),
                ));
            }
        }
        Ok(())
    }

    /// Apply the present fields onto `event`, stamping `updated_at`.
    pub fn apply(&self, event: &mut CalendarEvent, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            event.location = Some(location.clone());
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = Some(end);
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(event_type) = &self.event_type {
            event.event_type = event_type.clone();
        }
        if let Some(priority) = self.priority {
            event.priority = priority;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(matter_id) = self.matter_id {
            event.matter_id = Some(matter_id);
        }
        if let Some(client_id) = self.client_id {
            event.client_id = Some(client_id);
        }
        if let Some(assigned_to) = &self.assigned_to {
            event.assigned_to = assigned_to.clone();
        }
        if let Some(enabled) = self.reminders_enabled {
            event.reminders_enabled = enabled;
        }
        if let Some(minutes) = &self.reminder_minutes {
            event.reminder_minutes = minutes.clone();
        }
        if let Some(show) = self.show_in_client_portal {
            event.show_in_client_portal = show;
        }
        event.updated_at = now;
    }
}

/// AND-combined optional filters for event listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub start_from: Option<DateTime<Utc>>,
    pub start_until: Option<DateTime<Utc>>,
    pub matter_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub assigned_to: Option<Uuid>,
}

impl EventFilter {
    /// Predicate form of the filter, used by in-memory stores and tests.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if let Some(from) = self.start_from {
            if event.start < from {
                return false;
            }
        }
        if let Some(until) = self.start_until {
            if event.start > until {
                return false;
            }
        }
        if let Some(matter_id) = self.matter_id {
            if event.matter_id != Some(matter_id) {
                return false;
            }
        }
        if let Some(client_id) = self.client_id {
            if event.client_id != Some(client_id) {
                return false;
            }
        }
        if let Some(event_type) = &self.event_type {
            if &event.event_type != event_type {
                return false;
            }
        }
        if let Some(user) = self.assigned_to {
            if !event.assigned_to.contains(&user) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event(start: DateTime<Utc>) -> NewCalendarEvent {
        NewCalendarEvent {
            tenant_id: Uuid::now_v7(),
            created_by: Uuid::now_v7(),
            title: "Status hearing".into(),
            description: None,
            location: None,
            start,
            end: None,
            all_day: false,
            event_type: "court_date".into(),
            priority: Priority::default(),
            matter_id: None,
            client_id: None,
            assigned_to: vec![],
            kind: EventKind::Single,
            reminders_enabled: false,
            reminder_minutes: vec![],
            show_in_client_portal: false,
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut data = new_event(Utc::now());
        data.title = "  ".into();
        assert!(matches!(
            CalendarEvent::from_new(data, Utc::now()),
            Err(DocketError::Validation(_))
        ));
    }

    #[test]
    fn negative_reminder_offset_is_rejected() {
        let mut data = new_event(Utc::now());
        data.reminder_minutes = vec![60, -5];
        assert!(data.validate().is_err());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let start = Utc::now();
        let mut data = new_event(start);
        data.end = Some(start - Duration::hours(1));
        assert!(data.validate().is_err());
    }

    #[test]
    fn patch_touching_start_invalidates_reminders() {
        let patch = EventPatch { start: Some(Utc::now()), ..Default::default() };
        assert!(patch.touches_reminders());

        let patch = EventPatch { title: Some("Renamed".into()), ..Default::default() };
        assert!(!patch.touches_reminders());
    }

    #[test]
    fn filter_combines_with_and() {
        let now = Utc::now();
        let matter = Uuid::now_v7();
        let user = Uuid::now_v7();
        let mut data = new_event(now);
        data.matter_id = Some(matter);
        data.assigned_to = vec![user];
        let event = CalendarEvent::from_new(data, now).unwrap();

        let filter = EventFilter {
            matter_id: Some(matter),
            assigned_to: Some(user),
            ..Default::default()
        };
        assert!(filter.matches(&event));

        let filter = EventFilter {
            matter_id: Some(matter),
            assigned_to: Some(Uuid::now_v7()),
            ..Default::default()
        };
        assert!(!filter.matches(&event));
    }
}
