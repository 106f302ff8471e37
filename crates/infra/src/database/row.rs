//! Row structs bridging SQL primitives and domain types.
//!
//! Repositories read these with plain column getters inside `query_map`
//! closures, then convert into domain types afterwards so that uuid/enum/JSON
//! parsing failures surface as domain storage errors rather than panics.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use docket_domain::{
    CalendarEvent, CalendarReminder, DeadlineStatus, DocketError, EventKind, EventStatus,
    LegalDeadline, Priority, RecurrencePattern, ReminderChannel, ReminderStatus,
    Result,
};
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| DocketError::Storage(format!("corrupt uuid in column {field}: {value}")))
}

pub(crate) fn parse_uuid_opt(value: Option<&str>, field: &str) -> Result<Option<Uuid>> {
    value.map(|v| parse_uuid(v, field)).transpose()
}

pub(crate) fn datetime_from_ts(ts: i64, field: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| DocketError::Storage(format!("timestamp out of range in column {field}")))
}

pub(crate) fn datetime_from_ts_opt(
    ts: Option<i64>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    ts.map(|t| datetime_from_ts(t, field)).transpose()
}

pub(crate) fn ids_to_json(ids: &[Uuid]) -> String {
    let strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    // Serializing a Vec<String> cannot fail.
    serde_json::to_string(&strings).unwrap_or_else(|_| "[]".into())
}

pub(crate) fn ids_from_json(raw: &str, field: &str) -> Result<Vec<Uuid>> {
    let strings: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| DocketError::Storage(format!("corrupt json in column {field}: {e}")))?;
    strings.iter().map(|s| parse_uuid(s, field)).collect()
}

pub(crate) fn minutes_to_json(minutes: &[i64]) -> String {
    serde_json::to_string(minutes).unwrap_or_else(|_| "[]".into())
}

pub(crate) fn minutes_from_json(raw: &str, field: &str) -> Result<Vec<i64>> {
    serde_json::from_str(raw)
        .map_err(|e| DocketError::Storage(format!("corrupt json in column {field}: {e}")))
}

fn parse_enum<T: FromStr<Err = String>>(value: &str, field: &str) -> Result<T> {
    T::from_str(value)
        .map_err(|e| DocketError::Storage(format!("corrupt value in column {field}: {e}")))
}

/// The recurrence role of an event as stored across three nullable columns.
pub(crate) fn kind_to_columns(kind: &EventKind) -> (Option<String>, Option<i64>, Option<String>) {
    match kind {
        EventKind::Single => (None, None, None),
        EventKind::Template { pattern, until } => {
            (Some(pattern.to_string()), until.map(|u| u.timestamp()), None)
        }
        EventKind::Occurrence { parent_id } => (None, None, Some(parent_id.to_string())),
    }
}

fn kind_from_columns(
    pattern: Option<String>,
    until_ts: Option<i64>,
    parent_id: Option<String>,
) -> Result<EventKind> {
    match (pattern, parent_id) {
        (Some(_), Some(_)) => Err(DocketError::Storage(
            "event row carries both a recurrence pattern and a parent".into(),
        )),
        (Some(pattern), None) => Ok(EventKind::Template {
            pattern: RecurrencePattern::parse(&pattern)?,
            until: datetime_from_ts_opt(until_ts, "recurring_end_ts")?,
        }),
        (None, Some(parent)) => Ok(EventKind::Occurrence {
            parent_id: parse_uuid(&parent, "parent_event_id")?,
        }),
        (None, None) => Ok(EventKind::Single),
    }
}

/// Primitive projection of a `calendar_events` row.
pub(crate) struct EventRow {
    pub id: String,
    pub tenant_id: String,
    pub created_by: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub all_day: bool,
    pub event_type: String,
    pub priority: String,
    pub status: String,
    pub matter_id: Option<String>,
    pub client_id: Option<String>,
    pub assigned_to: String,
    pub recurring_pattern: Option<String>,
    pub recurring_end_ts: Option<i64>,
    pub parent_event_id: Option<String>,
    pub reminders_enabled: bool,
    pub reminder_minutes: String,
    pub show_in_client_portal: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl EventRow {
    pub const COLUMNS: &'static str = "id, tenant_id, created_by, title, description, location, \
         start_ts, end_ts, all_day, event_type, priority, status, matter_id, client_id, \
         assigned_to, recurring_pattern, recurring_end_ts, parent_event_id, reminders_enabled, \
         reminder_minutes, show_in_client_portal, created_at, updated_at";

    pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            created_by: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            location: row.get(5)?,
            start_ts: row.get(6)?,
            end_ts: row.get(7)?,
            all_day: row.get(8)?,
            event_type: row.get(9)?,
            priority: row.get(10)?,
            status: row.get(11)?,
            matter_id: row.get(12)?,
            client_id: row.get(13)?,
            assigned_to: row.get(14)?,
            recurring_pattern: row.get(15)?,
            recurring_end_ts: row.get(16)?,
            parent_event_id: row.get(17)?,
            reminders_enabled: row.get(18)?,
            reminder_minutes: row.get(19)?,
            show_in_client_portal: row.get(20)?,
            created_at: row.get(21)?,
            updated_at: row.get(22)?,
        })
    }
}

impl TryFrom<EventRow> for CalendarEvent {
    type Error = DocketError;

    fn try_from(row: EventRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(&row.id, "id")?,
            tenant_id: parse_uuid(&row.tenant_id, "tenant_id")?,
            created_by: parse_uuid(&row.created_by, "created_by")?,
            title: row.title,
            description: row.description,
            location: row.location,
            start: datetime_from_ts(row.start_ts, "start_ts")?,
            end: datetime_from_ts_opt(row.end_ts, "end_ts")?,
            all_day: row.all_day,
            event_type: row.event_type,
            priority: parse_enum::<Priority>(&row.priority, "priority")?,
            status: parse_enum::<EventStatus>(&row.status, "status")?,
            matter_id: parse_uuid_opt(row.matter_id.as_deref(), "matter_id")?,
            client_id: parse_uuid_opt(row.client_id.as_deref(), "client_id")?,
            assigned_to: ids_from_json(&row.assigned_to, "assigned_to")?,
            kind: kind_from_columns(
                row.recurring_pattern,
                row.recurring_end_ts,
                row.parent_event_id,
            )?,
            reminders_enabled: row.reminders_enabled,
            reminder_minutes: minutes_from_json(&row.reminder_minutes, "reminder_minutes")?,
            show_in_client_portal: row.show_in_client_portal,
            created_at: datetime_from_ts(row.created_at, "created_at")?,
            updated_at: datetime_from_ts(row.updated_at, "updated_at")?,
        })
    }
}

/// Primitive projection of a `calendar_reminders` row.
pub(crate) struct ReminderRow {
    pub id: String,
    pub tenant_id: String,
    pub event_id: String,
    pub channel: String,
    pub minutes_before: i64,
    pub recipients: String,
    pub status: String,
    pub sent_at: Option<i64>,
    pub created_at: i64,
}

impl ReminderRow {
    pub const COLUMNS: &'static str =
        "id, tenant_id, event_id, channel, minutes_before, recipients, status, sent_at, created_at";

    pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            event_id: row.get(2)?,
            channel: row.get(3)?,
            minutes_before: row.get(4)?,
            recipients: row.get(5)?,
            status: row.get(6)?,
            sent_at: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl TryFrom<ReminderRow> for CalendarReminder {
    type Error = DocketError;

    fn try_from(row: ReminderRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(&row.id, "id")?,
            tenant_id: parse_uuid(&row.tenant_id, "tenant_id")?,
            event_id: parse_uuid(&row.event_id, "event_id")?,
            channel: ReminderChannel::from_str(&row.channel)
                .map_err(|e| DocketError::Storage(format!("corrupt channel column: {e}")))?,
            minutes_before: row.minutes_before,
            recipients: ids_from_json(&row.recipients, "recipients")?,
            status: parse_enum::<ReminderStatus>(&row.status, "status")?,
            sent_at: datetime_from_ts_opt(row.sent_at, "sent_at")?,
            created_at: datetime_from_ts(row.created_at, "created_at")?,
        })
    }
}

/// Primitive projection of a `legal_deadlines` row.
pub(crate) struct DeadlineRow {
    pub id: String,
    pub tenant_id: String,
    pub created_by: String,
    pub title: String,
    pub description: Option<String>,
    pub deadline_type: String,
    pub jurisdiction: Option<String>,
    pub due_ts: i64,
    pub calculated_from_ts: Option<i64>,
    pub calculation_method: Option<String>,
    pub priority: String,
    pub status: String,
    pub matter_id: Option<String>,
    pub assigned_to: String,
    pub related_event_id: Option<String>,
    pub completed_at: Option<i64>,
    pub completed_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DeadlineRow {
    pub const COLUMNS: &'static str = "id, tenant_id, created_by, title, description, \
         deadline_type, jurisdiction, due_ts, calculated_from_ts, calculation_method, priority, \
         status, matter_id, assigned_to, related_event_id, completed_at, completed_by, \
         created_at, updated_at";

    pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            created_by: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            deadline_type: row.get(5)?,
            jurisdiction: row.get(6)?,
            due_ts: row.get(7)?,
            calculated_from_ts: row.get(8)?,
            calculation_method: row.get(9)?,
            priority: row.get(10)?,
            status: row.get(11)?,
            matter_id: row.get(12)?,
            assigned_to: row.get(13)?,
            related_event_id: row.get(14)?,
            completed_at: row.get(15)?,
            completed_by: row.get(16)?,
            created_at: row.get(17)?,
            updated_at: row.get(18)?,
        })
    }
}

impl TryFrom<DeadlineRow> for LegalDeadline {
    type Error = DocketError;

    fn try_from(row: DeadlineRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(&row.id, "id")?,
            tenant_id: parse_uuid(&row.tenant_id, "tenant_id")?,
            created_by: parse_uuid(&row.created_by, "created_by")?,
            title: row.title,
            description: row.description,
            deadline_type: row.deadline_type,
            jurisdiction: row.jurisdiction,
            due_date: datetime_from_ts(row.due_ts, "due_ts")?,
            calculated_from: datetime_from_ts_opt(row.calculated_from_ts, "calculated_from_ts")?,
            calculation_method: row.calculation_method,
            priority: parse_enum::<Priority>(&row.priority, "priority")?,
            status: parse_enum::<DeadlineStatus>(&row.status, "status")?,
            matter_id: parse_uuid_opt(row.matter_id.as_deref(), "matter_id")?,
            assigned_to: ids_from_json(&row.assigned_to, "assigned_to")?,
            related_event_id: parse_uuid_opt(row.related_event_id.as_deref(), "related_event_id")?,
            completed_at: datetime_from_ts_opt(row.completed_at, "completed_at")?,
            completed_by: parse_uuid_opt(row.completed_by.as_deref(), "completed_by")?,
            created_at: datetime_from_ts(row.created_at, "created_at")?,
            updated_at: datetime_from_ts(row.updated_at, "updated_at")?,
        })
    }
}
