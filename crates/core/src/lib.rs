//! # Docket Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for persistence and notification
//! - The calendar event, reminder, and deadline services
//!
//! ## Architecture Principles
//! - Only depends on `docket-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar;
pub mod deadlines;

// Infrastructure ports
pub mod notify_ports;

// Re-export specific items to avoid ambiguity
pub use calendar::events::CalendarEventService;
pub use calendar::ports::{EventRepository, ReminderRepository};
pub use calendar::reminders::ReminderService;
pub use deadlines::ports::DeadlineRepository;
pub use deadlines::DeadlineService;
pub use notify_ports::Notifier;
