//! SQLite-backed implementation of the DeadlineRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use docket_core::DeadlineRepository;
use docket_domain::{DeadlineFilter, LegalDeadline, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::pool::SqlitePool;
use super::row::{ids_to_json, DeadlineRow};
use crate::errors::InfraError;

/// SQLite implementation of DeadlineRepository
pub struct SqliteDeadlineRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteDeadlineRepository {
    /// Create a new deadline repository
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeadlineRepository for SqliteDeadlineRepository {
    #[instrument(skip(self, deadline), fields(deadline_id = %deadline.id))]
    async fn insert(&self, deadline: &LegalDeadline) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO legal_deadlines (
                id, tenant_id, created_by, title, description, deadline_type,
                jurisdiction, due_ts, calculated_from_ts, calculation_method,
                priority, status, matter_id, assigned_to, related_event_id,
                completed_at, completed_by, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                deadline.id.to_string(),
                deadline.tenant_id.to_string(),
                deadline.created_by.to_string(),
                deadline.title,
                deadline.description,
                deadline.deadline_type,
                deadline.jurisdiction,
                deadline.due_date.timestamp(),
                deadline.calculated_from.map(|c| c.timestamp()),
                deadline.calculation_method,
                deadline.priority.to_string(),
                deadline.status.to_string(),
                deadline.matter_id.map(|m| m.to_string()),
                ids_to_json(&deadline.assigned_to),
                deadline.related_event_id.map(|e| e.to_string()),
                deadline.completed_at.map(|c| c.timestamp()),
                deadline.completed_by.map(|u| u.to_string()),
                deadline.created_at.timestamp(),
                deadline.updated_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        debug!(deadline_id = %deadline.id, "inserted legal deadline");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<LegalDeadline>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM legal_deadlines WHERE id = ?1",
                DeadlineRow::COLUMNS
            ))
            .map_err(InfraError::from)?;

        let mut rows = stmt
            .query_map(params![id.to_string()], DeadlineRow::read)
            .map_err(InfraError::from)?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(InfraError::from)?.try_into()?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, tenant_id: Uuid, filter: &DeadlineFilter) -> Result<Vec<LegalDeadline>> {
        let conn = self.pool.get()?;

        let mut sql = format!(
            "SELECT {} FROM legal_deadlines WHERE tenant_id = ?1",
            DeadlineRow::COLUMNS
        );
        let mut params: Vec<Value> = vec![Value::Text(tenant_id.to_string())];

        if let Some(matter_id) = filter.matter_id {
            params.push(Value::Text(matter_id.to_string()));
            sql.push_str(&format!(" AND matter_id = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(Value::Text(status.to_string()));
            sql.push_str(&format!(" AND status = ?{}", params.len()));
        }
        if let Some(from) = filter.due_from {
            params.push(Value::Integer(from.timestamp()));
            sql.push_str(&format!(" AND due_ts >= ?{}", params.len()));
        }
        if let Some(until) = filter.due_until {
            params.push(Value::Integer(until.timestamp()));
            sql.push_str(&format!(" AND due_ts <= ?{}", params.len()));
        }
        if let Some(jurisdiction) = &filter.jurisdiction {
            params.push(Value::Text(jurisdiction.clone()));
            sql.push_str(&format!(" AND jurisdiction = ?{}", params.len()));
        }
        if let Some(user) = filter.assigned_to {
            params.push(Value::Text(user.to_string()));
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM json_each(legal_deadlines.assigned_to) \
                 WHERE json_each.value = ?{})",
                params.len()
            ));
        }
        if let Some(deadline_type) = &filter.deadline_type {
            params.push(Value::Text(deadline_type.clone()));
            sql.push_str(&format!(" AND deadline_type = ?{}", params.len()));
        }
        sql.push_str(" ORDER BY due_ts ASC");

        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params_from_iter(params), DeadlineRow::read)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(tenant_id = %tenant_id, count = rows.len(), "listed legal deadlines");
        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self, deadline), fields(deadline_id = %deadline.id))]
    async fn update(&self, deadline: &LegalDeadline) -> Result<()> {
        let conn = self.pool.get()?;
        let changed = conn
            .execute(
                "UPDATE legal_deadlines SET
                    title = ?2, description = ?3, deadline_type = ?4,
                    jurisdiction = ?5, due_ts = ?6, calculated_from_ts = ?7,
                    calculation_method = ?8, priority = ?9, status = ?10,
                    matter_id = ?11, assigned_to = ?12, related_event_id = ?13,
                    completed_at = ?14, completed_by = ?15, updated_at = ?16
                 WHERE id = ?1",
                params![
                    deadline.id.to_string(),
                    deadline.title,
                    deadline.description,
                    deadline.deadline_type,
                    deadline.jurisdiction,
                    deadline.due_date.timestamp(),
                    deadline.calculated_from.map(|c| c.timestamp()),
                    deadline.calculation_method,
                    deadline.priority.to_string(),
                    deadline.status.to_string(),
                    deadline.matter_id.map(|m| m.to_string()),
                    ids_to_json(&deadline.assigned_to),
                    deadline.related_event_id.map(|e| e.to_string()),
                    deadline.completed_at.map(|c| c.timestamp()),
                    deadline.completed_by.map(|u| u.to_string()),
                    deadline.updated_at.timestamp(),
                ],
            )
            .map_err(InfraError::from)?;

        debug!(deadline_id = %deadline.id, changed, "updated legal deadline");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get()?;
        let deleted = conn
            .execute("DELETE FROM legal_deadlines WHERE id = ?1", params![id.to_string()])
            .map_err(InfraError::from)?;

        debug!(deadline_id = %id, deleted, "deleted legal deadline");
        Ok(())
    }
}
