//! Granularity, Side, and BookLevel enums

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlanError;

/// Candle duration accepted by the candles endpoint
///
/// The exchange rejects any other value, so this is a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Granularity {
    /// 1 minute candles
    OneMinute = 60,
    /// 5 minute candles
    FiveMinutes = 300,
    /// 15 minute candles
    FifteenMinutes = 900,
    /// 1 hour candles
    OneHour = 3600,
    /// 6 hour candles
    SixHours = 21600,
    /// 1 day candles
    OneDay = 86400,
}

impl Granularity {
    /// Returns the candle duration in seconds
    pub fn as_secs(&self) -> u32 {
        *self as u32
    }

    /// Returns every supported granularity, shortest first
    pub fn all() -> &'static [Granularity] {
        &[
            Self::OneMinute,
            Self::FiveMinutes,
            Self::FifteenMinutes,
            Self::OneHour,
            Self::SixHours,
            Self::OneDay,
        ]
    }

    /// Returns a short label (e.g., "5m", "1d")
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::OneDay => "1d",
        }
    }
}

impl TryFrom<u32> for Granularity {
    type Error = PlanError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|g| g.as_secs() == value)
            .ok_or(PlanError::InvalidGranularity { value })
    }
}

impl From<Granularity> for u32 {
    fn from(granularity: Granularity) -> Self {
        granularity.as_secs()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

/// Taker side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Order book aggregation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookLevel {
    /// Best bid and ask only
    #[default]
    Best = 1,
    /// Top 50 aggregated bids and asks
    Top50 = 2,
    /// Full non-aggregated book (polling strongly discouraged)
    Full = 3,
}

impl BookLevel {
    /// Returns the value of the `level` query parameter
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}
