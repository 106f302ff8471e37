//! # Docket Domain
//!
//! Business domain types and models for the Docket legal calendar engine.
//!
//! This crate contains:
//! - Domain data types (CalendarEvent, CalendarReminder, LegalDeadline)
//! - Domain error types and Result definitions
//! - Business-day and recurrence arithmetic
//! - Domain constants and models
//!
//! ## Architecture
//! - No dependencies on other Docket crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
// Re-export date/recurrence utilities
pub use utils::business_days::{
    add_business_days, business_days_between, is_business_day, jurisdiction_due_date,
};
pub use utils::recurrence::{
    generate_occurrences, next_occurrence, Frequency, Occurrences, ParsedPattern,
    RecurrencePattern,
};
pub use utils::timeform::{
    format_date, format_datetime, is_deadline_approaching, is_deadline_overdue, time_until,
};
