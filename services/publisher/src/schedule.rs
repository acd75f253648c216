//! Scheduled publish time validation
//!
//! Schedule times arrive as UTC `YYYY-MM-DD HH:MM` strings and leave as Unix
//! epoch seconds, which is what the Graph API expects.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use thiserror::Error;

/// Accepted schedule time format
pub const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Minimum lead time, in minutes, for a scheduled publish
pub const MIN_LEAD_MINUTES: i64 = 10;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// When a video should go live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    Immediate,
    ScheduledAt(i64),
}

impl ScheduleDecision {
    /// Epoch seconds to send upstream, if scheduled
    pub fn publish_time(&self) -> Option<i64> {
        match self {
            ScheduleDecision::Immediate => None,
            ScheduleDecision::ScheduledAt(epoch) => Some(*epoch),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid scheduled_time '{0}': expected format YYYY-MM-DD HH:MM (UTC)")]
    Unparseable(String),

    #[error("Scheduled publish time must be at least 10 minutes in the future")]
    TooSoon,
}

/// Parse a `YYYY-MM-DD HH:MM` string as a UTC instant
pub fn parse_schedule_time(raw: &str) -> Result<DateTime<Utc>, ScheduleError> {
    NaiveDateTime::parse_from_str(raw.trim(), SCHEDULE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ScheduleError::Unparseable(raw.to_string()))
}

/// Decide when to publish, given the optional raw schedule time.
///
/// A missing or blank value publishes immediately. Anything else must parse
/// and lie at least [`MIN_LEAD_MINUTES`] after `now`; exactly ten minutes
/// is accepted.
pub fn decide(raw: Option<&str>, now: DateTime<Utc>) -> Result<ScheduleDecision, ScheduleError> {
    let raw = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(ScheduleDecision::Immediate),
    };

    let scheduled = parse_schedule_time(raw)?;
    if scheduled - now < Duration::minutes(MIN_LEAD_MINUTES) {
        return Err(ScheduleError::TooSoon);
    }

    Ok(ScheduleDecision::ScheduledAt(scheduled.timestamp()))
}

/// Render epoch seconds back into the accepted schedule format
pub fn format_schedule_time(epoch: i64) -> Option<String> {
    DateTime::from_timestamp(epoch, 0).map(|instant| instant.format(SCHEDULE_FORMAT).to_string())
}
