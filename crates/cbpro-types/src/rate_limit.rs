//! Client-side rate limiting primitives
//!
//! The exchange throttles public endpoints per IP. [`TokenBucket`] models
//! that budget so several callers sharing one transport stay under the
//! ceiling together; `cbpro-rest` wraps it in a mutex for shared use.

use std::time::{Duration, Instant};

use crate::error::RateLimitError;

/// Token bucket over a burst `capacity` and a sustained `refill_rate`
///
/// Every method takes the current instant, so the bucket runs on whatever
/// clock the caller uses. Time going backwards adds no tokens.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    tokens: f64,
    /// Tokens per second
    refill_rate: f64,
    updated: Instant,
}

impl TokenBucket {
    /// Create a full bucket whose clock starts at `now`
    ///
    /// Use [`RateLimitConfig::create_bucket`] to reject a zero capacity or
    /// a non-positive rate up front.
    pub fn new(capacity: u32, refill_rate: f64, now: Instant) -> Self {
        Self {
            capacity,
            tokens: f64::from(capacity),
            refill_rate,
            updated: now,
        }
    }

    /// Take `tokens` as of `now`, or return how long until they would be available
    ///
    /// With a zero refill rate the wait is [`Duration::MAX`].
    pub fn try_acquire(&mut self, tokens: u32, now: Instant) -> Result<(), Duration> {
        self.advance(now);

        let shortfall = f64::from(tokens) - self.tokens;
        if shortfall <= 0.0 {
            self.tokens -= f64::from(tokens);
            return Ok(());
        }
        if self.refill_rate <= 0.0 {
            return Err(Duration::MAX);
        }
        let wait = Duration::try_from_secs_f64(shortfall / self.refill_rate).unwrap_or(Duration::MAX);
        Err(wait)
    }

    /// Whole tokens available as of `now`
    pub fn available(&mut self, now: Instant) -> u32 {
        self.advance(now);
        self.tokens as u32
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Tokens added per second
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// Refill to capacity and restart the clock at `now`
    pub fn reset(&mut self, now: Instant) {
        self.tokens = f64::from(self.capacity);
        self.updated = now;
    }

    fn advance(&mut self, now: Instant) {
        let Some(elapsed) = now.checked_duration_since(self.updated) else {
            return;
        };
        let refilled = self.tokens + elapsed.as_secs_f64() * self.refill_rate;
        self.tokens = refilled.min(f64::from(self.capacity));
        self.updated = now;
    }
}

/// Burst size and sustained rate for one token bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum tokens (burst)
    pub capacity: u32,
    /// Tokens per second refill rate
    pub refill_rate: f64,
}

impl RateLimitConfig {
    /// Create a new rate limit configuration
    pub const fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
        }
    }

    /// Documented public endpoint limit: 3 requests/second, bursts of 6
    pub const fn coinbase_public() -> Self {
        Self::new(6, 3.0)
    }

    /// Effectively unlimited (for testing)
    pub const fn permissive() -> Self {
        Self::new(1000, 1000.0)
    }

    /// Check that a bucket built from this config can ever grant a request
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.capacity == 0 {
            return Err(RateLimitError::ZeroCapacity);
        }
        if !self.refill_rate.is_finite() || self.refill_rate <= 0.0 {
            return Err(RateLimitError::InvalidRefillRate(self.refill_rate));
        }
        Ok(())
    }

    /// Create a full token bucket from this configuration
    pub fn create_bucket(&self, now: Instant) -> Result<TokenBucket, RateLimitError> {
        self.validate()?;
        Ok(TokenBucket::new(self.capacity, self.refill_rate, now))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::coinbase_public()
    }
}
