//! SQLite-backed implementation of the EventRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use docket_core::EventRepository;
use docket_domain::{CalendarEvent, EventFilter, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::pool::SqlitePool;
use super::row::{ids_to_json, kind_to_columns, minutes_to_json, EventRow};
use crate::errors::InfraError;

/// SQLite implementation of EventRepository
pub struct SqliteEventRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteEventRepository {
    /// Create a new event repository
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn insert(&self, event: &CalendarEvent) -> Result<()> {
        let conn = self.pool.get()?;
        let (pattern, until_ts, parent_id) = kind_to_columns(&event.kind);

        conn.execute(
            "INSERT INTO calendar_events (
                id, tenant_id, created_by, title, description, location,
                start_ts, end_ts, all_day, event_type, priority, status,
                matter_id, client_id, assigned_to, recurring_pattern,
                recurring_end_ts, parent_event_id, reminders_enabled,
                reminder_minutes, show_in_client_portal, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
            params![
                event.id.to_string(),
                event.tenant_id.to_string(),
                event.created_by.to_string(),
                event.title,
                event.description,
                event.location,
                event.start.timestamp(),
                event.end.map(|e| e.timestamp()),
                event.all_day,
                event.event_type,
                event.priority.to_string(),
                event.status.to_string(),
                event.matter_id.map(|m| m.to_string()),
                event.client_id.map(|c| c.to_string()),
                ids_to_json(&event.assigned_to),
                pattern,
                until_ts,
                parent_id,
                event.reminders_enabled,
                minutes_to_json(&event.reminder_minutes),
                event.show_in_client_portal,
                event.created_at.timestamp(),
                event.updated_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        debug!(event_id = %event.id, "inserted calendar event");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM calendar_events WHERE id = ?1",
                EventRow::COLUMNS
            ))
            .map_err(InfraError::from)?;

        let mut rows = stmt
            .query_map(params![id.to_string()], EventRow::read)
            .map_err(InfraError::from)?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(InfraError::from)?.try_into()?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, tenant_id: Uuid, filter: &EventFilter) -> Result<Vec<CalendarEvent>> {
        let conn = self.pool.get()?;

        let mut sql = format!(
            "SELECT {} FROM calendar_events WHERE tenant_id = ?1",
            EventRow::COLUMNS
        );
        let mut params: Vec<Value> = vec![Value::Text(tenant_id.to_string())];

        if let Some(from) = filter.start_from {
            params.push(Value::Integer(from.timestamp()));
            sql.push_str(&format!(" AND start_ts >= ?{}", params.len()));
        }
        if let Some(until) = filter.start_until {
            params.push(Value::Integer(until.timestamp()));
            sql.push_str(&format!(" AND start_ts <= ?{}", params.len()));
        }
        if let Some(matter_id) = filter.matter_id {
            params.push(Value::Text(matter_id.to_string()));
            sql.push_str(&format!(" AND matter_id = ?{}", params.len()));
        }
        if let Some(client_id) = filter.client_id {
            params.push(Value::Text(client_id.to_string()));
            sql.push_str(&format!(" AND client_id = ?{}", params.len()));
        }
        if let Some(event_type) = &filter.event_type {
            params.push(Value::Text(event_type.clone()));
            sql.push_str(&format!(" AND event_type = ?{}", params.len()));
        }
        if let Some(user) = filter.assigned_to {
            params.push(Value::Text(user.to_string()));
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM json_each(calendar_events.assigned_to) \
                 WHERE json_each.value = ?{})",
                params.len()
            ));
        }
        sql.push_str(" ORDER BY start_ts ASC");

        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params_from_iter(params), EventRow::read)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(tenant_id = %tenant_id, count = rows.len(), "listed calendar events");
        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self))]
    async fn children_of(&self, template_id: Uuid) -> Result<Vec<CalendarEvent>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM calendar_events WHERE parent_event_id = ?1 ORDER BY start_ts ASC",
                EventRow::COLUMNS
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![template_id.to_string()], EventRow::read)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &CalendarEvent) -> Result<()> {
        let conn = self.pool.get()?;
        let (pattern, until_ts, parent_id) = kind_to_columns(&event.kind);

        let changed = conn
            .execute(
                "UPDATE calendar_events SET
                    title = ?2, description = ?3, location = ?4, start_ts = ?5,
                    end_ts = ?6, all_day = ?7, event_type = ?8, priority = ?9,
                    status = ?10, matter_id = ?11, client_id = ?12,
                    assigned_to = ?13, recurring_pattern = ?14,
                    recurring_end_ts = ?15, parent_event_id = ?16,
                    reminders_enabled = ?17, reminder_minutes = ?18,
                    show_in_client_portal = ?19, updated_at = ?20
                 WHERE id = ?1",
                params![
                    event.id.to_string(),
                    event.title,
                    event.description,
                    event.location,
                    event.start.timestamp(),
                    event.end.map(|e| e.timestamp()),
                    event.all_day,
                    event.event_type,
                    event.priority.to_string(),
                    event.status.to_string(),
                    event.matter_id.map(|m| m.to_string()),
                    event.client_id.map(|c| c.to_string()),
                    ids_to_json(&event.assigned_to),
                    pattern,
                    until_ts,
                    parent_id,
                    event.reminders_enabled,
                    minutes_to_json(&event.reminder_minutes),
                    event.show_in_client_portal,
                    event.updated_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

        debug!(event_id = %event.id, changed, "updated calendar event");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get()?;
        let deleted = conn
            .execute("DELETE FROM calendar_events WHERE id = ?1", params![id.to_string()])
            .map_err(InfraError::from)?;

        debug!(event_id = %id, deleted, "deleted calendar event");
        Ok(())
    }
}
