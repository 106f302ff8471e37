//! Reminder model types
//!
//! A reminder is an at-most-once notification tied to one event and one
//! minutes-before offset. Channels are a closed union: the legacy "all" wire
//! value maps onto `Multi` over every known channel, so adding a channel is an
//! exhaustiveness-checked change rather than a new stringly branch.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DocketError, Result};
use crate::impl_status_conversions;

/// A single delivery channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
    InApp,
}

impl_status_conversions!(Channel {
    Email => "email",
    Sms => "sms",
    InApp => "in_app",
});

impl Channel {
    pub const ALL: [Self; 3] = [Self::Email, Self::Sms, Self::InApp];
}

/// Where a reminder is routed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Email,
    Sms,
    InApp,
    /// Fan out over several channels. The legacy "all" value parses to
    /// `Multi` over every known channel.
    Multi(Vec<Channel>),
}

impl ReminderChannel {
    /// The concrete channels this route fans out to.
    pub fn channels(&self) -> Vec<Channel> {
        match self {
            Self::Email => vec![Channel::Email],
            Self::Sms => vec![Channel::Sms],
            Self::InApp => vec![Channel::InApp],
            Self::Multi(channels) => channels.clone(),
        }
    }
}

impl Default for ReminderChannel {
    fn default() -> Self {
        Self::Email
    }
}

impl fmt::Display for ReminderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
            Self::InApp => write!(f, "in_app"),
            Self::Multi(channels) if channels.len() == Channel::ALL.len() => write!(f, "all"),
            Self::Multi(channels) => {
                let joined = channels
                    .iter()
                    .map(Channel::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{joined}")
            }
        }
    }
}

impl FromStr for ReminderChannel {
    type Err = DocketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "in_app" => Ok(Self::InApp),
            "all" => Ok(Self::Multi(Channel::ALL.to_vec())),
            other if other.contains(',') => {
                let channels = other
                    .split(',')
                    .map(|part| {
                        Channel::from_str(part.trim())
                            .map_err(DocketError::Validation)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Multi(channels))
            }
            other => Err(DocketError::Validation(format!(
                "unknown reminder channel: {other}"
            ))),
        }
    }
}

/// Dispatch state of a reminder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Sent,
}

impl_status_conversions!(ReminderStatus {
    Pending => "pending",
    Sent => "sent",
});

/// A scheduled notification owned by exactly one event.
///
/// Invariant: `sent_at` is non-null iff `status == Sent`; the transition
/// happens exactly once, at dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarReminder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub event_id: Uuid,
    pub channel: ReminderChannel,
    pub minutes_before: i64,
    pub recipients: Vec<Uuid>,
    pub status: ReminderStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CalendarReminder {
    /// Build a pending reminder for `event_id`, validating the offset.
    pub fn pending(
        tenant_id: Uuid,
        event_id: Uuid,
        channel: ReminderChannel,
        minutes_before: i64,
        recipients: Vec<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if minutes_before < 0 {
            return Err(DocketError::Validation(
                "reminder offsets must be non-negative minutes".into(),
            ));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            tenant_id,
            event_id,
            channel,
            minutes_before,
            recipients,
            status: ReminderStatus::Pending,
            sent_at: None,
            created_at: now,
        })
    }

    /// The moment this reminder should fire, given its event's start.
    pub fn remind_at(&self, event_start: DateTime<Utc>) -> DateTime<Utc> {
        event_start - Duration::minutes(self.minutes_before)
    }

    /// True once the fire moment has passed.
    pub fn is_due(&self, event_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.remind_at(event_start) <= now
    }
}
