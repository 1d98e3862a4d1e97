//! Call schedule resolution
//!
//! A [`CallSchedule`] describes when a call should be placed: either an
//! absolute instant, or a daily time-of-day in a named timezone that is
//! resolved to its next occurrence. Resolution happens once, at schedule
//! time; the resulting instant is stored and never re-evaluated.

use crate::{Error, Result};
use chrono::{DateTime, Days, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// When a call should be placed
///
/// Mirrors the wire shape a route handler deserializes: both fields are
/// optional and [`CallSchedule::resolve`] validates that one is present.
/// When both are set, the absolute `scheduled_time` wins.
///
/// # Examples
///
/// ```rust
/// use outdial::CallSchedule;
///
/// // Absolute instant
/// let at = CallSchedule::at("2030-01-01T00:00:00Z".parse().unwrap());
///
/// // Next 5pm New York time
/// let daily = CallSchedule::time_of_day("17:00", "America/New_York");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallSchedule {
    /// Absolute execution instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Wall-clock time of day, `"HH:MM"` (seconds accepted and ignored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// IANA timezone name for `time_of_day`; defaults to UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl CallSchedule {
    /// Schedule at an absolute instant
    #[must_use]
    pub fn at(scheduled_time: DateTime<Utc>) -> Self {
        Self {
            scheduled_time: Some(scheduled_time),
            ..Self::default()
        }
    }

    /// Schedule at the next occurrence of a wall-clock time in a timezone
    #[must_use]
    pub fn time_of_day(time: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            scheduled_time: None,
            time_of_day: Some(time.into()),
            timezone: Some(timezone.into()),
        }
    }

    /// Resolve this schedule to an absolute UTC instant
    ///
    /// A time-of-day resolves to today's occurrence in the given timezone if
    /// that instant is strictly after `now`, otherwise to the next day's. A
    /// wall-clock time skipped by a DST transition rolls forward the same
    /// way; an ambiguous one takes the earlier instant.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Some(at) = self.scheduled_time {
            return Ok(at);
        }

        let Some(time_of_day) = self.time_of_day.as_deref() else {
            return Err(Error::Validation("no scheduled time provided".into()));
        };

        let time = parse_time_of_day(time_of_day)?;
        let tz_name = self.timezone.as_deref().unwrap_or("UTC");
        let tz: Tz = tz_name
            .parse()
            .map_err(|_| Error::Validation(format!("unknown timezone: {tz_name}")))?;

        let today = now.with_timezone(&tz).date_naive();
        for day_offset in 0..=2 {
            let date = today
                .checked_add_days(Days::new(day_offset))
                .ok_or_else(|| Error::Validation("scheduled date out of range".into()))?;
            if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
                let candidate = candidate.with_timezone(&Utc);
                if candidate > now {
                    return Ok(candidate);
                }
            }
        }

        Err(Error::Validation(format!(
            "could not resolve time of day {time_of_day} in {tz_name}"
        )))
    }
}

/// Parse `"HH:MM"` (or `"HH:MM:SS"`, seconds ignored) into a wall-clock time
fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| Error::Validation(format!("invalid time of day: {input}")))?;

    // minute precision only
    NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0)
        .ok_or_else(|| Error::Validation(format!("invalid time of day: {input}")))
}
