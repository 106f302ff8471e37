//! Recurrence pattern parsing and occurrence generation
//!
//! Patterns travel on the wire as `"frequency:interval"` strings, e.g.
//! `"weekly:2"` for every second week. A missing interval defaults to 1.
//! `ParsedPattern` is the raw split (unknown frequencies preserved for the
//! caller to reject); `RecurrencePattern` is the validated form used by the
//! scheduling code.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DocketError, Result};
use crate::impl_status_conversions;

/// How often a series repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl_status_conversions!(Frequency {
    Daily => "daily",
    Weekly => "weekly",
    Biweekly => "biweekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Yearly => "yearly",
});

/// Raw `"type:interval"` split. The frequency is kept verbatim so callers
/// can surface unknown values in their own error paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    pub kind: String,
    pub interval: u32,
}

impl ParsedPattern {
    /// Split a pattern string. A missing or unparseable interval defaults
    /// to 1; the frequency segment is preserved as-is.
    pub fn parse(pattern: &str) -> Self {
        let mut parts = pattern.splitn(2, ':');
        let kind = parts.next().unwrap_or_default().trim().to_lowercase();
        let interval = parts
            .next()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|i| *i > 0)
            .unwrap_or(1);
        Self { kind, interval }
    }
}

/// A validated recurrence pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "String", try_from = "String")]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    pub interval: u32,
}

impl RecurrencePattern {
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self { frequency, interval: interval.max(1) }
    }

    /// Parse and validate a `"frequency:interval"` string.
    pub fn parse(pattern: &str) -> Result<Self> {
        let parsed = ParsedPattern::parse(pattern);
        let frequency = Frequency::from_str(&parsed.kind)
            .map_err(|_| DocketError::InvalidPattern(pattern.to_string()))?;
        Ok(Self::new(frequency, parsed.interval))
    }

    /// The occurrence following `base`.
    pub fn next_after(&self, base: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let interval = self.interval;
        let stepped = match self.frequency {
            Frequency::Daily => Some(base + Duration::days(i64::from(interval))),
            Frequency::Weekly => Some(base + Duration::days(7 * i64::from(interval))),
            Frequency::Biweekly => Some(base + Duration::days(14 * i64::from(interval))),
            Frequency::Monthly => base.checked_add_months(Months::new(interval)),
            Frequency::Quarterly => base.checked_add_months(Months::new(3 * interval)),
            Frequency::Yearly => base.checked_add_months(Months::new(12 * interval)),
        };
        stepped.ok_or_else(|| {
            DocketError::Internal(format!("date overflow stepping {self} from {base}"))
        })
    }

    /// Lazy sequence of up to `count` occurrences beginning at `start`.
    pub fn occurrences(
        &self,
        start: DateTime<Utc>,
        count: usize,
        until: Option<DateTime<Utc>>,
    ) -> Occurrences {
        Occurrences {
            pattern: self.clone(),
            next: Some(start),
            remaining: count,
            until,
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.frequency, self.interval)
    }
}

impl From<RecurrencePattern> for String {
    fn from(pattern: RecurrencePattern) -> Self {
        pattern.to_string()
    }
}

impl TryFrom<String> for RecurrencePattern {
    type Error = DocketError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// The occurrence following `base` for a raw frequency string.
///
/// Fails with `InvalidPattern` on unknown frequencies.
pub fn next_occurrence(
    base: DateTime<Utc>,
    frequency: &str,
    interval: u32,
) -> Result<DateTime<Utc>> {
    let frequency = Frequency::from_str(frequency)
        .map_err(|_| DocketError::InvalidPattern(frequency.to_string()))?;
    RecurrencePattern::new(frequency, interval).next_after(base)
}

/// Lazy sequence of up to `count` occurrences of a raw pattern string.
///
/// Fails with `InvalidPattern` before producing anything if the pattern
/// does not validate.
pub fn generate_occurrences(
    start: DateTime<Utc>,
    pattern: &str,
    count: usize,
    until: Option<DateTime<Utc>>,
) -> Result<Occurrences> {
    Ok(RecurrencePattern::parse(pattern)?.occurrences(start, count, until))
}

/// Lazy, finite, restartable occurrence sequence.
///
/// Yields at most `count` dates beginning with `start`; stops early the
/// first time a candidate exceeds `until`. `Clone` restarts the walk.
#[derive(Debug, Clone)]
pub struct Occurrences {
    pattern: RecurrencePattern,
    next: Option<DateTime<Utc>>,
    remaining: usize,
    until: Option<DateTime<Utc>>,
}

impl Iterator for Occurrences {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        if let Some(until) = self.until {
            if current > until {
                self.next = None;
                return None;
            }
        }
        self.remaining -= 1;
        // Overflow terminates the sequence instead of erroring mid-iteration.
        self.next = self.pattern.next_after(current).ok();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn split_with_interval() {
        let parsed = ParsedPattern::parse("weekly:2");
        assert_eq!(parsed, ParsedPattern { kind: "weekly".into(), interval: 2 });
    }

    #[test]
    fn missing_interval_defaults_to_one() {
        let parsed = ParsedPattern::parse("monthly");
        assert_eq!(parsed, ParsedPattern { kind: "monthly".into(), interval: 1 });
    }

    #[test]
    fn junk_interval_defaults_to_one() {
        assert_eq!(ParsedPattern::parse("daily:x").interval, 1);
        assert_eq!(ParsedPattern::parse("daily:0").interval, 1);
    }

    #[test]
    fn unknown_kind_is_preserved_raw() {
        let parsed = ParsedPattern::parse("fortnightly:3");
        assert_eq!(parsed.kind, "fortnightly");
        assert!(RecurrencePattern::parse("fortnightly:3").is_err());
    }

    #[test]
    fn validated_pattern_round_trips() {
        let pattern = RecurrencePattern::parse("biweekly:2").unwrap();
        assert_eq!(pattern.to_string(), "biweekly:2");
        assert_eq!(RecurrencePattern::parse(&pattern.to_string()).unwrap(), pattern);
    }

    #[test]
    fn weekly_steps_seven_days() {
        let base = utc(2025, 1, 6);
        let pattern = RecurrencePattern::new(Frequency::Weekly, 1);
        assert_eq!(pattern.next_after(base).unwrap(), utc(2025, 1, 13));

        let pattern = RecurrencePattern::new(Frequency::Weekly, 2);
        assert_eq!(pattern.next_after(base).unwrap(), utc(2025, 1, 20));
    }

    #[test]
    fn biweekly_steps_fourteen_days() {
        let base = utc(2025, 1, 6);
        let pattern = RecurrencePattern::new(Frequency::Biweekly, 1);
        assert_eq!(pattern.next_after(base).unwrap(), utc(2025, 1, 20));
    }

    #[test]
    fn monthly_clamps_day_of_month() {
        // chrono clamps Jan 31 + 1 month to Feb 28.
        let base = utc(2025, 1, 31);
        let pattern = RecurrencePattern::new(Frequency::Monthly, 1);
        assert_eq!(pattern.next_after(base).unwrap(), utc(2025, 2, 28));
    }

    #[test]
    fn quarterly_and_yearly_step_months() {
        let base = utc(2025, 1, 15);
        assert_eq!(
            RecurrencePattern::new(Frequency::Quarterly, 1).next_after(base).unwrap(),
            utc(2025, 4, 15)
        );
        assert_eq!(
            RecurrencePattern::new(Frequency::Yearly, 1).next_after(base).unwrap(),
            utc(2026, 1, 15)
        );
    }

    #[test]
    fn unknown_frequency_fails() {
        let err = next_occurrence(utc(2025, 1, 1), "hourly", 1);
        assert!(matches!(err, Err(DocketError::InvalidPattern(_))));
    }

    #[test]
    fn daily_sequence_of_five() {
        let start = utc(2025, 3, 1);
        let pattern = RecurrencePattern::parse("daily:1").unwrap();
        let dates: Vec<_> = pattern.occurrences(start, 5, None).collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], start);
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn raw_pattern_sequence_validates_first() {
        let start = utc(2025, 3, 1);
        let dates: Vec<_> = generate_occurrences(start, "weekly:2", 3, None)
            .unwrap()
            .collect();
        assert_eq!(dates, vec![start, utc(2025, 3, 15), utc(2025, 3, 29)]);

        assert!(matches!(
            generate_occurrences(start, "hourly:1", 3, None),
            Err(DocketError::InvalidPattern(_))
        ));
    }

    #[test]
    fn end_date_cuts_sequence_short() {
        let start = utc(2025, 3, 1);
        let until = utc(2025, 3, 4);
        let pattern = RecurrencePattern::parse("daily:1").unwrap();
        let dates: Vec<_> = pattern.occurrences(start, 100, Some(until)).collect();
        assert_eq!(dates.len(), 4);
        assert!(dates.iter().all(|d| *d <= until));
        assert_eq!(*dates.last().unwrap(), until);
    }

    #[test]
    fn sequence_is_restartable() {
        let start = utc(2025, 3, 1);
        let pattern = RecurrencePattern::parse("weekly:1").unwrap();
        let occurrences = pattern.occurrences(start, 3, None);
        let first: Vec<_> = occurrences.clone().collect();
        let second: Vec<_> = occurrences.collect();
        assert_eq!(first, second);
    }
}
