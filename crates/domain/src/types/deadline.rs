//! Legal deadline model types
//!
//! A deadline is the authoritative record; when mirrored, a derived calendar
//! event tracks it one-directionally (deadline → event).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::EventStatus;
use super::Priority;
use crate::errors::{DocketError, Result};
use crate::impl_status_conversions;

/// Lifecycle status of a legal deadline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Pending,
    Extended,
    Completed,
    Cancelled,
}

impl_status_conversions!(DeadlineStatus {
    Pending => "pending",
    Extended => "extended",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl Default for DeadlineStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl DeadlineStatus {
    /// Status projected onto the mirrored calendar event.
    pub fn mirrored_event_status(self) -> EventStatus {
        match self {
            Self::Completed => EventStatus::Completed,
            Self::Cancelled => EventStatus::Cancelled,
            Self::Extended => EventStatus::Rescheduled,
            Self::Pending => EventStatus::Pending,
        }
    }

    /// Statuses still eligible for approaching/overdue queries.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Extended)
    }
}

/// How a due date is derived from a base date in a given jurisdiction:
/// calendar days are applied first, business days on top of the result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JurisdictionRule {
    #[serde(default)]
    pub calendar_days: i64,
    #[serde(default)]
    pub business_days: i64,
    /// Accepted for compatibility with upstream rule definitions but never
    /// consulted: the computation ignores holidays.
    #[serde(default)]
    pub exclude_holidays: bool,
}

/// A tracked legal deadline owned by one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalDeadline {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub deadline_type: String,
    pub jurisdiction: Option<String>,
    pub due_date: DateTime<Utc>,
    pub calculated_from: Option<DateTime<Utc>>,
    pub calculation_method: Option<String>,
    pub priority: Priority,
    pub status: DeadlineStatus,
    pub matter_id: Option<Uuid>,
    pub assigned_to: Vec<Uuid>,
    /// Exclusive 1:1 mirror into the calendar, if any.
    pub related_event_id: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LegalDeadline {
    /// Build a validated deadline from caller input.
    pub fn from_new(data: NewLegalDeadline, now: DateTime<Utc>) -> Result<Self> {
        data.validate()?;
        Ok(Self {
            id: Uuid::now_v7(),
            tenant_id: data.tenant_id,
            created_by: data.created_by,
            title: data.title,
            description: data.description,
            deadline_type: data.deadline_type,
            jurisdiction: data.jurisdiction,
            due_date: data.due_date,
            calculated_from: data.calculated_from,
            calculation_method: data.calculation_method,
            priority: data.priority,
            status: DeadlineStatus::Pending,
            matter_id: data.matter_id,
            assigned_to: data.assigned_to,
            related_event_id: data.related_event_id,
            completed_at: None,
            completed_by: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Caller input for deadline creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLegalDeadline {
    pub tenant_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub deadline_type: String,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub calculated_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub calculation_method: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub matter_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
    /// When absent, a mirrored calendar event is created automatically.
    #[serde(default)]
    pub related_event_id: Option<Uuid>,
    #[serde(default)]
    pub reminders_enabled: bool,
    #[serde(default)]
    pub show_in_client_portal: bool,
}

impl NewLegalDeadline {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DocketError::Validation(
                "deadline title must not be empty".into(),
            ));
        }
        if self.deadline_type.trim().is_empty() {
            return Err(DocketError::Validation(
                "deadline type must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update for a deadline. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadlinePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub status: Option<DeadlineStatus>,
    pub matter_id: Option<Uuid>,
    pub assigned_to: Option<Vec<Uuid>>,
}

impl DeadlinePatch {
    /// True when any field that propagates onto the mirrored event is set.
    pub fn touches_mirror(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.due_date.is_some()
            || self.priority.is_some()
            || self.assigned_to.is_some()
            || self.status.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(DocketError::Validation(
                    "deadline title must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Apply the present fields onto `deadline`, stamping `updated_at`.
    pub fn apply(&self, deadline: &mut LegalDeadline, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            deadline.title = title.clone();
        }
        if let Some(description) = &self.description {
            deadline.description = Some(description.clone());
        }
        if let Some(deadline_type) = &self.deadline_type {
            deadline.deadline_type = deadline_type.clone();
        }
        if let Some(jurisdiction) = &self.jurisdiction {
            deadline.jurisdiction = Some(jurisdiction.clone());
        }
        if let Some(due_date) = self.due_date {
            deadline.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            deadline.priority = priority;
        }
        if let Some(status) = self.status {
            deadline.status = status;
        }
        if let Some(matter_id) = self.matter_id {
            deadline.matter_id = Some(matter_id);
        }
        if let Some(assigned_to) = &self.assigned_to {
            deadline.assigned_to = assigned_to.clone();
        }
        deadline.updated_at = now;
    }
}

/// AND-combined optional filters for deadline listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadlineFilter {
    pub matter_id: Option<Uuid>,
    pub status: Option<DeadlineStatus>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_until: Option<DateTime<Utc>>,
    pub jurisdiction: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub deadline_type: Option<String>,
}

impl DeadlineFilter {
    /// Predicate form of the filter, used by in-memory stores and tests.
    pub fn matches(&self, deadline: &LegalDeadline) -> bool {
        if let Some(matter_id) = self.matter_id {
            if deadline.matter_id != Some(matter_id) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if deadline.status != status {
                return false;
            }
        }
        if let Some(from) = self.due_from {
            if deadline.due_date < from {
                return false;
            }
        }
        if let Some(until) = self.due_until {
            if deadline.due_date > until {
                return false;
            }
        }
        if let Some(jurisdiction) = &self.jurisdiction {
            if deadline.jurisdiction.as_ref() != Some(jurisdiction) {
                return false;
            }
        }
        if let Some(user) = self.assigned_to {
            if !deadline.assigned_to.contains(&user) {
                return false;
            }
        }
        if let Some(deadline_type) = &self.deadline_type {
            if &deadline.deadline_type != deadline_type {
                return false;
            }
        }
        true
    }
}
