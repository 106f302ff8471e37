//! Business-day arithmetic
//!
//! Business days are Monday through Friday. No holiday calendar is applied
//! anywhere in this module; see `JurisdictionRule::exclude_holidays`.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use crate::types::JurisdictionRule;

/// True iff `date` falls on a weekday.
pub fn is_business_day(date: DateTime<Utc>) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Advance `date` by `n` business days, skipping weekends entirely.
///
/// The walk moves one calendar day at a time and only counts weekdays, so a
/// Friday plus one business day lands on the following Monday. `n <= 0`
/// returns `date` unchanged.
pub fn add_business_days(date: DateTime<Utc>, n: i64) -> DateTime<Utc> {
    let mut current = date;
    let mut added = 0;
    while added < n {
        current += Duration::days(1);
        if is_business_day(current) {
            added += 1;
        }
    }
    current
}

/// Count weekdays in the half-open range `[start, end)`.
pub fn business_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let mut current = start;
    let mut count = 0;
    while current < end {
        if is_business_day(current) {
            count += 1;
        }
        current += Duration::days(1);
    }
    count
}

/// Derive a due date from `base` under a jurisdiction rule.
///
/// Calendar days are applied first; business days are then counted from the
/// calendar-adjusted date, not from `base`. The rule's `exclude_holidays`
/// flag is accepted but not consulted, matching the documented upstream
/// behavior.
pub fn jurisdiction_due_date(base: DateTime<Utc>, rule: &JurisdictionRule) -> DateTime<Utc> {
    let calendar_adjusted = base + Duration::days(rule.calendar_days);
    add_business_days(calendar_adjusted, rule.business_days)
}
