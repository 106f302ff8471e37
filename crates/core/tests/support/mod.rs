//! Shared test fixtures for core service tests

pub mod notifier;
pub mod repositories;

use std::sync::Arc;

use docket_core::{CalendarEventService, DeadlineService, ReminderService};

pub use notifier::RecordingNotifier;
pub use repositories::{MockDeadlineRepository, MockEventRepository, MockReminderRepository};

/// Fully wired in-memory service stack.
///
/// The mocks are cheap clones over shared state, so tests can keep handles
/// and inspect rows after driving the services.
pub struct TestHarness {
    pub events: Arc<CalendarEventService>,
    pub deadlines: Arc<DeadlineService>,
    pub reminders: Arc<ReminderService>,
    pub event_repo: MockEventRepository,
    pub reminder_repo: MockReminderRepository,
    pub deadline_repo: MockDeadlineRepository,
    pub notifier: RecordingNotifier,
}

impl TestHarness {
    pub fn new() -> Self {
        let event_repo = MockEventRepository::default();
        let reminder_repo = MockReminderRepository::new(event_repo.clone());
        let deadline_repo = MockDeadlineRepository::default();
        let notifier = RecordingNotifier::default();

        let reminders = Arc::new(ReminderService::new(
            Arc::new(reminder_repo.clone()),
            Arc::new(notifier.clone()),
        ));
        let events = Arc::new(CalendarEventService::new(
            Arc::new(event_repo.clone()),
            reminders.clone(),
        ));
        let deadlines = Arc::new(DeadlineService::new(
            Arc::new(deadline_repo.clone()),
            events.clone(),
        ));

        Self { events, deadlines, reminders, event_repo, reminder_repo, deadline_repo, notifier }
    }
}
