//! Reminder scan and dispatch integration tests

mod support;

use chrono::{Duration, Utc};
use docket_domain::{EventKind, NewCalendarEvent, Priority, ReminderStatus};
use support::TestHarness;
use uuid::Uuid;

fn event_starting_in(minutes: i64, reminder_minutes: Vec<i64>) -> NewCalendarEvent {
    NewCalendarEvent {
        tenant_id: Uuid::now_v7(),
        created_by: Uuid::now_v7(),
        title: "Deposition prep".into(),
        description: Some("Review exhibits with counsel".into()),
        location: Some("Conference room".into()),
        start: Utc::now() + Duration::minutes(minutes),
        end: None,
        all_day: false,
        event_type: "meeting".into(),
        priority: Priority::default(),
        matter_id: None,
        client_id: None,
        assigned_to: vec![Uuid::now_v7(), Uuid::now_v7()],
        kind: EventKind::Single,
        reminders_enabled: true,
        reminder_minutes,
        show_in_client_portal: false,
    }
}

#[tokio::test]
async fn due_reminders_are_sent_exactly_once() {
    let harness = TestHarness::new();

    // Starts in 30 minutes with a 60-minute lead: due now.
    let event = harness
        .events
        .create_event(event_starting_in(30, vec![60]))
        .await
        .unwrap();

    let sent = harness.reminders.process_due_reminders().await.unwrap();
    assert_eq!(sent, 1);

    let messages = harness.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].recipients, event.assigned_to);

    let rows = harness.reminder_repo.rows();
    assert_eq!(rows[0].status, ReminderStatus::Sent);
    assert!(rows[0].sent_at.is_some());

    // Second scan finds nothing: the sent_at filter excludes the row.
    let sent_again = harness.reminders.process_due_reminders().await.unwrap();
    assert_eq!(sent_again, 0);
    assert_eq!(harness.notifier.messages().len(), 1);
}

#[tokio::test]
async fn reminders_not_yet_due_stay_pending() {
    let harness = TestHarness::new();

    // Starts in 2 hours with a 10-minute lead: not due.
    harness
        .events
        .create_event(event_starting_in(120, vec![10]))
        .await
        .unwrap();

    let sent = harness.reminders.process_due_reminders().await.unwrap();
    assert_eq!(sent, 0);
    assert!(harness.notifier.messages().is_empty());
    assert_eq!(harness.reminder_repo.rows()[0].status, ReminderStatus::Pending);
}

#[tokio::test]
async fn failed_dispatch_is_retried_on_the_next_scan() {
    let harness = TestHarness::new();
    harness
        .events
        .create_event(event_starting_in(30, vec![60]))
        .await
        .unwrap();

    harness.notifier.set_failing(true);
    let sent = harness.reminders.process_due_reminders().await.unwrap();
    assert_eq!(sent, 0);
    assert_eq!(harness.reminder_repo.rows()[0].status, ReminderStatus::Pending);

    harness.notifier.set_failing(false);
    let sent = harness.reminders.process_due_reminders().await.unwrap();
    assert_eq!(sent, 1);
    assert_eq!(harness.reminder_repo.rows()[0].status, ReminderStatus::Sent);
}

#[tokio::test]
async fn subject_and_body_carry_event_details() {
    let harness = TestHarness::new();
    harness
        .events
        .create_event(event_starting_in(30, vec![60]))
        .await
        .unwrap();

    harness.reminders.process_due_reminders().await.unwrap();

    let messages = harness.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].subject.starts_with("Reminder: Deposition prep - "));
    assert!(messages[0].subject.ends_with(" from now"));
    assert!(messages[0].html_body.contains("Deposition prep"));
    assert!(messages[0].html_body.contains("Conference room"));
    assert!(messages[0].html_body.contains("Review exhibits with counsel"));
}

#[tokio::test]
async fn every_configured_offset_becomes_its_own_reminder() {
    let harness = TestHarness::new();

    // 90- and 60-minute leads are due for an event 30 minutes out; the
    // 5-minute lead is not.
    harness
        .events
        .create_event(event_starting_in(30, vec![90, 60, 5]))
        .await
        .unwrap();

    let sent = harness.reminders.process_due_reminders().await.unwrap();
    assert_eq!(sent, 2);
    assert_eq!(harness.notifier.messages().len(), 2);

    let pending: Vec<_> = harness
        .reminder_repo
        .rows()
        .into_iter()
        .filter(|r| r.status == ReminderStatus::Pending)
        .collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].minutes_before, 5);
}
