//! Scheduling infrastructure for automated task execution
//!
//! Provides the cron-based reminder scan scheduler. The scheduler follows
//! explicit lifecycle rules: start/stop are deliberate operations, spawned
//! tasks keep their join handles, cancellation is token-based, and every
//! asynchronous operation is wrapped in a timeout.

pub mod error;
pub mod reminder_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reminder_scheduler::{ReminderScheduler, ReminderSchedulerConfig};
