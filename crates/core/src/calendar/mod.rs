//! Calendar events and reminders

pub mod events;
pub mod ports;
pub mod reminders;

pub use events::CalendarEventService;
pub use ports::{EventRepository, ReminderRepository};
pub use reminders::ReminderService;
