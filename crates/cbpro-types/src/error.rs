//! Error types for request planning

use thiserror::Error;

/// Errors raised while validating or planning a candle request
///
/// All of these are detected locally, before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Range start is after range end
    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },

    /// Granularity is not one the exchange accepts
    #[error("Unsupported granularity {value}s (expected one of 60, 300, 900, 3600, 21600, 86400)")]
    InvalidGranularity { value: u32 },

    /// A plan needs room for at least one candle per request
    #[error("Max candles per request must be at least 1")]
    InvalidMaxCandles,
}

/// Rate limit settings under which no request would ever be granted
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RateLimitError {
    /// A bucket that holds no tokens
    #[error("Rate limit capacity must be at least 1")]
    ZeroCapacity,

    /// Refill rate that is zero, negative or not finite
    #[error("Rate limit refill rate must be a positive number, got {0}")]
    InvalidRefillRate(f64),
}

/// Result type alias for planning operations
pub type PlanResult<T> = Result<T, PlanError>;
