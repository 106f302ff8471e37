//! SQLite-backed implementation of the ReminderRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docket_core::ReminderRepository;
use docket_domain::{CalendarEvent, CalendarReminder, Result};
use rusqlite::params;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::pool::SqlitePool;
use super::row::{ids_to_json, EventRow, ReminderRow};
use crate::errors::InfraError;

/// SQLite implementation of ReminderRepository
pub struct SqliteReminderRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteReminderRepository {
    /// Create a new reminder repository
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for SqliteReminderRepository {
    #[instrument(skip(self, reminder), fields(reminder_id = %reminder.id))]
    async fn insert(&self, reminder: &CalendarReminder) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO calendar_reminders (
                id, tenant_id, event_id, channel, minutes_before,
                recipients, status, sent_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                reminder.id.to_string(),
                reminder.tenant_id.to_string(),
                reminder.event_id.to_string(),
                reminder.channel.to_string(),
                reminder.minutes_before,
                ids_to_json(&reminder.recipients),
                reminder.status.to_string(),
                reminder.sent_at.map(|s| s.timestamp()),
                reminder.created_at.timestamp(),
            ],
        )
        .map_err(InfraError::from)?;

        debug!(reminder_id = %reminder.id, event_id = %reminder.event_id, "inserted reminder");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<CalendarReminder>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM calendar_reminders WHERE id = ?1",
                ReminderRow::COLUMNS
            ))
            .map_err(InfraError::from)?;

        let mut rows = stmt
            .query_map(params![id.to_string()], ReminderRow::read)
            .map_err(InfraError::from)?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(InfraError::from)?.try_into()?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn for_event(&self, event_id: Uuid) -> Result<Vec<CalendarReminder>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM calendar_reminders WHERE event_id = ?1 ORDER BY minutes_before ASC",
                ReminderRow::COLUMNS
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![event_id.to_string()], ReminderRow::read)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self))]
    async fn pending_with_events(&self) -> Result<Vec<(CalendarReminder, CalendarEvent)>> {
        let conn = self.pool.get()?;

        // Column lists are disjoint per table, so qualify and read the
        // reminder columns first, then the event columns at an offset.
        let reminder_cols = ReminderRow::COLUMNS
            .split(", ")
            .map(|c| format!("r.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let event_cols = EventRow::COLUMNS
            .split(", ")
            .map(|c| format!("e.{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {reminder_cols}, {event_cols}
                 FROM calendar_reminders r
                 JOIN calendar_events e ON e.id = r.event_id
                 WHERE r.status = 'pending' AND r.sent_at IS NULL"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map([], |row| {
                let reminder = ReminderRow::read(row)?;
                let event = EventRow {
                    id: row.get(9)?,
                    tenant_id: row.get(10)?,
                    created_by: row.get(11)?,
                    title: row.get(12)?,
                    description: row.get(13)?,
                    location: row.get(14)?,
                    start_ts: row.get(15)?,
                    end_ts: row.get(16)?,
                    all_day: row.get(17)?,
                    event_type: row.get(18)?,
                    priority: row.get(19)?,
                    status: row.get(20)?,
                    matter_id: row.get(21)?,
                    client_id: row.get(22)?,
                    assigned_to: row.get(23)?,
                    recurring_pattern: row.get(24)?,
                    recurring_end_ts: row.get(25)?,
                    parent_event_id: row.get(26)?,
                    reminders_enabled: row.get(27)?,
                    reminder_minutes: row.get(28)?,
                    show_in_client_portal: row.get(29)?,
                    created_at: row.get(30)?,
                    updated_at: row.get(31)?,
                };
                Ok((reminder, event))
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "loaded pending reminders");

        rows.into_iter()
            .map(|(reminder, event)| Ok((reminder.try_into()?, event.try_into()?)))
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_for_event(&self, event_id: Uuid) -> Result<usize> {
        let conn = self.pool.get()?;
        let deleted = conn
            .execute(
                "DELETE FROM calendar_reminders WHERE event_id = ?1",
                params![event_id.to_string()],
            )
            .map_err(InfraError::from)?;

        debug!(event_id = %event_id, deleted, "deleted event reminders");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<bool> {
        let conn = self.pool.get()?;

        // Guarded update: only a still-pending, never-sent row transitions.
        // The affected-row count tells us whether this call won the race.
        let changed = conn
            .execute(
                "UPDATE calendar_reminders
                 SET status = 'sent', sent_at = ?2
                 WHERE id = ?1 AND status = 'pending' AND sent_at IS NULL",
                params![id.to_string(), sent_at.timestamp()],
            )
            .map_err(InfraError::from)?;

        Ok(changed == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use docket_core::EventRepository;
    use docket_domain::{
        EventKind, NewCalendarEvent, Priority, ReminderChannel, ReminderStatus,
    };
    use tempfile::TempDir;

    use super::super::event_repository::SqliteEventRepository;
    use super::super::manager::DbManager;
    use super::super::pool::SqlitePoolConfig;
    use super::*;

    fn setup_test_db() -> (Arc<SqlitePool>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(&db_path, SqlitePoolConfig::default()).unwrap();
        manager.run_migrations().unwrap();
        (manager.pool().clone(), temp_dir)
    }

    async fn stored_event(pool: &Arc<SqlitePool>) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        let event = CalendarEvent::from_new(
            NewCalendarEvent {
                tenant_id: Uuid::now_v7(),
                created_by: Uuid::now_v7(),
                title: "Filing due".into(),
                description: None,
                location: None,
                start,
                end: None,
                all_day: true,
                event_type: "filing_deadline".into(),
                priority: Priority::Critical,
                matter_id: None,
                client_id: None,
                assigned_to: vec![Uuid::now_v7()],
                kind: EventKind::Single,
                reminders_enabled: true,
                reminder_minutes: vec![60],
                show_in_client_portal: false,
            },
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        SqliteEventRepository::new(pool.clone()).insert(&event).await.unwrap();
        event
    }

    fn pending_reminder(event: &CalendarEvent) -> CalendarReminder {
        CalendarReminder::pending(
            event.tenant_id,
            event.id,
            ReminderChannel::default(),
            60,
            event.assigned_to.clone(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_find_round_trips() {
        let (pool, _temp) = setup_test_db();
        let repo = SqliteReminderRepository::new(pool.clone());

        let event = stored_event(&pool).await;
        let reminder = pending_reminder(&event);
        repo.insert(&reminder).await.unwrap();

        let found = repo.find(reminder.id).await.unwrap().expect("reminder stored");
        assert_eq!(found, reminder);
    }

    #[tokio::test]
    async fn pending_scan_joins_owning_event() {
        let (pool, _temp) = setup_test_db();
        let repo = SqliteReminderRepository::new(pool.clone());

        let event = stored_event(&pool).await;
        let reminder = pending_reminder(&event);
        repo.insert(&reminder).await.unwrap();

        let pending = repo.pending_with_events().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0.id, reminder.id);
        assert_eq!(pending[0].1.id, event.id);

        repo.mark_sent(reminder.id, Utc::now()).await.unwrap();
        assert!(repo.pending_with_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_sent_transitions_exactly_once() {
        let (pool, _temp) = setup_test_db();
        let repo = SqliteReminderRepository::new(pool.clone());

        let event = stored_event(&pool).await;
        let reminder = pending_reminder(&event);
        repo.insert(&reminder).await.unwrap();

        let sent_at = Utc.with_ymd_and_hms(2025, 3, 10, 13, 0, 0).unwrap();
        assert!(repo.mark_sent(reminder.id, sent_at).await.unwrap());
        // The second caller loses the compare-and-set.
        assert!(!repo.mark_sent(reminder.id, Utc::now()).await.unwrap());

        let found = repo.find(reminder.id).await.unwrap().unwrap();
        assert_eq!(found.status, ReminderStatus::Sent);
        assert_eq!(found.sent_at, Some(sent_at));
    }

    #[tokio::test]
    async fn delete_for_event_sweeps_all_rows() {
        let (pool, _temp) = setup_test_db();
        let repo = SqliteReminderRepository::new(pool.clone());

        let event = stored_event(&pool).await;
        repo.insert(&pending_reminder(&event)).await.unwrap();
        repo.insert(&pending_reminder(&event)).await.unwrap();

        assert_eq!(repo.delete_for_event(event.id).await.unwrap(), 2);
        assert!(repo.for_event(event.id).await.unwrap().is_empty());
    }
}
