//! Time handling for Meetup queries and records.
//!
//! This module provides [`TimeWindow`], the `<beginning>,<end>` expression
//! Meetup's events API accepts in its `time` parameter, and helpers to render
//! the epoch-millisecond timestamps the API returns.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format used when displaying event start times.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats epoch milliseconds in the given timezone.
///
/// Returns `None` when the timestamp is out of range.
pub fn format_millis<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: fmt::Display,
{
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string())
}

/// Formats epoch milliseconds in the local timezone.
pub fn format_millis_local(millis: i64) -> Option<String> {
    format_millis(millis, &Local)
}

/// Errors produced when parsing a time-window expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    /// The expression has no `,` separating beginning and end.
    #[error("time window `{0}` must have the form <beginning>,<end>")]
    MissingSeparator(String),

    /// One side of the window is neither empty, absolute nor relative.
    #[error("invalid time bound `{0}`: expected epoch milliseconds or a relative offset like -1w")]
    InvalidBound(String),
}

/// Unit of a relative time bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
}

impl TimeUnit {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Days),
            'w' => Some(Self::Weeks),
            'm' => Some(Self::Months),
            _ => None,
        }
    }
}

/// One side of a [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    /// No bound on this side.
    Open,
    /// Absolute time in milliseconds since the Unix epoch.
    Absolute(i64),
    /// Offset from the time the request is served, e.g. `-1w` or `2m`.
    Relative { amount: i64, unit: TimeUnit },
}

impl TimeBound {
    fn parse(raw: &str) -> Result<Self, TimeWindowError> {
        let s = raw.trim();
        if s.is_empty() {
            return Ok(Self::Open);
        }

        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<i64>()
                .map(Self::Absolute)
                .map_err(|_| TimeWindowError::InvalidBound(raw.to_string()));
        }

        let invalid = || TimeWindowError::InvalidBound(raw.to_string());
        let suffix = s.chars().last().ok_or_else(invalid)?;
        let unit = TimeUnit::from_suffix(suffix).ok_or_else(invalid)?;
        let number = &s[..s.len() - suffix.len_utf8()];
        let digits = number.trim_start_matches(['-', '+']);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let amount = number.parse::<i64>().map_err(|_| invalid())?;

        Ok(Self::Relative { amount, unit })
    }

    /// Resolves the bound to an instant relative to `now`.
    ///
    /// Returns `None` for open bounds and for values chrono cannot represent.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            Self::Open => None,
            Self::Absolute(millis) => DateTime::from_timestamp_millis(millis),
            Self::Relative { amount, unit } => match unit {
                TimeUnit::Days => now.checked_add_signed(Duration::try_days(amount)?),
                TimeUnit::Weeks => now.checked_add_signed(Duration::try_weeks(amount)?),
                TimeUnit::Months => {
                    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
                    if amount < 0 {
                        now.checked_sub_months(months)
                    } else {
                        now.checked_add_months(months)
                    }
                }
            },
        }
    }
}

/// A time range in Meetup's `<beginning>,<end>` syntax.
///
/// The expression is validated on parse and sent upstream verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeWindow {
    raw: String,
    start: TimeBound,
    end: TimeBound,
}

impl TimeWindow {
    /// The window used when none is configured: the last week up to now.
    pub const DEFAULT_EXPRESSION: &'static str = "-1w,";

    /// Parses a time-window expression.
    pub fn parse(expr: &str) -> Result<Self, TimeWindowError> {
        let (start, end) = expr
            .split_once(',')
            .ok_or_else(|| TimeWindowError::MissingSeparator(expr.to_string()))?;

        Ok(Self {
            raw: expr.trim().to_string(),
            start: TimeBound::parse(start)?,
            end: TimeBound::parse(end)?,
        })
    }

    /// Returns the expression as sent to the API.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resolves both bounds relative to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.start.resolve(now), self.end.resolve(now))
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            raw: Self::DEFAULT_EXPRESSION.to_string(),
            start: TimeBound::Relative {
                amount: -1,
                unit: TimeUnit::Weeks,
            },
            end: TimeBound::Open,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TimeWindow {
    type Err = TimeWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = TimeWindowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> Self {
        window.raw
    }
}
