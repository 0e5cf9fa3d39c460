//! Shared types for the Coinbase Pro public REST API
//!
//! This crate holds the I/O-free building blocks used by `cbpro-rest`.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Candle`] - OHLCV bucket as returned by the candles endpoint
//! - [`Granularity`], [`Side`], [`BookLevel`] - Request/response enums
//! - [`TimeRange`], [`RequestWindow`] - Inclusive spans in Unix seconds
//! - [`IntervalPlan`] - Splits a time range into API-sized request windows
//! - [`ProductId`] - Product identifiers (e.g., "BTC-USD")
//! - [`TokenBucket`], [`RateLimitConfig`] - Client-side rate limiting

pub mod candle;
pub mod enums;
pub mod error;
pub mod planner;
pub mod product;
pub mod range;
pub mod rate_limit;

// Re-export commonly used types
pub use candle::*;
pub use enums::*;
pub use error::*;
pub use planner::*;
pub use product::*;
pub use range::*;
pub use rate_limit::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
