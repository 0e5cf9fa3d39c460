//! Inclusive time spans in Unix seconds

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::Granularity;

/// Caller-requested span of history, both bounds inclusive
///
/// Construction does not validate ordering; planning does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// First second of the range
    pub start: i64,
    /// Last second of the range
    pub end: i64,
}

impl TimeRange {
    /// Create a range from Unix timestamps in seconds
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Create a range from UTC datetimes, truncating to whole seconds
    pub fn from_datetimes(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(start.timestamp(), end.timestamp())
    }

    /// Number of candles this range implies at the given granularity
    pub fn candle_count(&self, granularity: Granularity) -> u64 {
        candle_count(self.start, self.end, granularity)
    }
}

/// One API-sized slice of a [`TimeRange`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestWindow {
    /// Window start (inclusive)
    pub start: i64,
    /// Window end (inclusive)
    pub end: i64,
}

impl RequestWindow {
    /// Create a new request window
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Number of candles this window implies at the given granularity
    pub fn candle_count(&self, granularity: Granularity) -> u64 {
        candle_count(self.start, self.end, granularity)
    }

    /// Window start formatted for the candles query (e.g., "2021-01-01T00:00:00Z")
    pub fn start_iso8601(&self) -> Option<String> {
        to_iso8601(self.start)
    }

    /// Window end formatted for the candles query
    pub fn end_iso8601(&self) -> Option<String> {
        to_iso8601(self.end)
    }
}

impl fmt::Display for RequestWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Format a Unix timestamp as ISO-8601 UTC with whole seconds
///
/// Returns `None` if the timestamp is outside chrono's supported range.
pub fn to_iso8601(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn candle_count(start: i64, end: i64, granularity: Granularity) -> u64 {
    if end <= start {
        return 0;
    }
    end.abs_diff(start)
        .div_ceil(u64::from(granularity.as_secs()))
}
