//! Presentation helpers for dates and deltas

use chrono::{DateTime, Duration, Utc};

use crate::constants::{
    APPROACHING_WINDOW_DAYS, DATETIME_DISPLAY_FORMAT, DATE_DISPLAY_FORMAT, PAST_DUE_LABEL,
};

/// Human-readable date, e.g. "January 6, 2025".
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

/// Human-readable date and time, e.g. "January 6, 2025 at 9:00 AM".
pub fn format_datetime(date: DateTime<Utc>) -> String {
    date.format(DATETIME_DISPLAY_FORMAT).to_string()
}

/// Largest non-zero unit of the delta until `target`, pluralized.
///
/// Returns "past due" for non-positive deltas. The minutes branch is the
/// terminal one, so a delta under a minute reads "0 minutes".
pub fn time_until(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = target - now;
    if delta <= Duration::zero() {
        return PAST_DUE_LABEL.to_string();
    }

    let days = delta.num_days();
    if days > 0 {
        return pluralize(days, "day");
    }
    let hours = delta.num_hours();
    if hours > 0 {
        return pluralize(hours, "hour");
    }
    pluralize(delta.num_minutes(), "minute")
}

/// True iff `date` falls within `(now, now + 7 days]`.
pub fn is_deadline_approaching(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date > now && date <= now + Duration::days(APPROACHING_WINDOW_DAYS)
}

/// True iff `date` is strictly in the past.
pub fn is_deadline_overdue(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date < now
}

fn pluralize(amount: i64, unit: &str) -> String {
    if amount == 1 {
        format!("1 {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_display_dates() {
        let date = Utc.with_ymd_and_hms(2025, 1, 6, 9, 30, 0).unwrap();
        assert_eq!(format_date(date), "January 6, 2025");
        assert_eq!(format_datetime(date), "January 6, 2025 at 9:30 AM");
    }

    #[test]
    fn picks_largest_nonzero_unit() {
        let now = Utc::now();
        assert_eq!(time_until(now + Duration::days(3), now), "3 days");
        assert_eq!(time_until(now + Duration::days(1) + Duration::hours(2), now), "1 day");
        assert_eq!(time_until(now + Duration::hours(5), now), "5 hours");
        assert_eq!(time_until(now + Duration::minutes(1), now), "1 minute");
        assert_eq!(time_until(now + Duration::minutes(45), now), "45 minutes");
        assert_eq!(time_until(now + Duration::seconds(30), now), "0 minutes");
    }

    #[test]
    fn past_due_sentinel() {
        let now = Utc::now();
        assert_eq!(time_until(now, now), PAST_DUE_LABEL);
        assert_eq!(time_until(now - Duration::minutes(5), now), PAST_DUE_LABEL);
    }

    #[test]
    fn approaching_window_is_half_open() {
        let now = Utc::now();
        assert!(!is_deadline_approaching(now, now));
        assert!(is_deadline_approaching(now + Duration::hours(1), now));
        assert!(is_deadline_approaching(now + Duration::days(7), now));
        assert!(!is_deadline_approaching(now + Duration::days(7) + Duration::minutes(1), now));
        assert!(!is_deadline_approaching(now - Duration::hours(1), now));
    }

    #[test]
    fn overdue_is_strictly_past() {
        let now = Utc::now();
        assert!(is_deadline_overdue(now - Duration::seconds(1), now));
        assert!(!is_deadline_overdue(now, now));
        assert!(!is_deadline_overdue(now + Duration::seconds(1), now));
    }
}
