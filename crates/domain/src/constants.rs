//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Deadline windows
pub const APPROACHING_WINDOW_DAYS: i64 = 7;

// Recurrence expansion
pub const DEFAULT_OCCURRENCE_EXPANSION: usize = 10;
pub const MAX_OCCURRENCE_EXPANSION: usize = 365;

// Reminder scan configuration
pub const DEFAULT_REMINDER_SCAN_CRON: &str = "0 * * * * *"; // every minute
pub const REMINDER_SUBJECT_PREFIX: &str = "Reminder";

// Mirrored deadline events
pub const FILING_DEADLINE_EVENT_TYPE: &str = "filing_deadline";

// Presentation
pub const PAST_DUE_LABEL: &str = "past due";
pub const DATE_DISPLAY_FORMAT: &str = "%B %-d, %Y";
pub const DATETIME_DISPLAY_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";
