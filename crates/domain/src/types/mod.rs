//! Domain types and models

pub mod calendar;
pub mod deadline;
pub mod reminder;

use serde::{Deserialize, Serialize};

pub use calendar::{
    CalendarEvent, EventFilter, EventKind, EventPatch, EventStatus, NewCalendarEvent,
};
pub use deadline::{
    DeadlineFilter, DeadlinePatch, DeadlineStatus, JurisdictionRule, LegalDeadline,
    NewLegalDeadline,
};
pub use reminder::{CalendarReminder, Channel, ReminderChannel, ReminderStatus};

use crate::impl_status_conversions;

/// Priority shared by calendar events and legal deadlines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl_status_conversions!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}
