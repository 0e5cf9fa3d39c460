//! Thread-safe rate limiter shared across callers of one transport
//!
//! The candle fetcher's fixed throttle only spaces out its own requests.
//! When several tasks share an [`HttpTransport`](crate::HttpTransport),
//! attach a [`SharedRateLimiter`] so every request draws from one budget.

use std::sync::Arc;
use std::time::Duration;

use cbpro_types::{RateLimitConfig, TokenBucket};
use parking_lot::Mutex;
use tracing::{instrument, trace};

use crate::error::{RestError, RestResult};

/// Token-bucket limiter guarded by a mutex
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    bucket: Mutex<TokenBucket>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_valid(RateLimitConfig::coinbase_public())
    }
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    ///
    /// Fails with [`RestError::Config`] if the configuration could never
    /// grant a request (zero capacity, or a refill rate that is not a
    /// positive number).
    pub fn new(config: RateLimitConfig) -> RestResult<Self> {
        let bucket = config
            .create_bucket(now())
            .map_err(|e| RestError::Config(e.to_string()))?;
        Ok(Self {
            config,
            bucket: Mutex::new(bucket),
        })
    }

    /// Create a permissive rate limiter (for testing)
    pub fn permissive() -> Self {
        Self::from_valid(RateLimitConfig::permissive())
    }

    /// Built-in configurations that are known to validate
    fn from_valid(config: RateLimitConfig) -> Self {
        Self {
            config,
            bucket: Mutex::new(TokenBucket::new(config.capacity, config.refill_rate, now())),
        }
    }

    /// Try to take one request slot without waiting
    ///
    /// Returns `Err(wait)` with the time until a slot frees up.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.bucket.lock().try_acquire(1, now())
    }

    /// Wait until a request slot is available, then take it
    #[instrument(skip(self), level = "debug")]
    pub async fn acquire(&self) {
        loop {
            match self.try_acquire() {
                Ok(()) => return,
                Err(wait) => {
                    trace!(?wait, "Rate limited, waiting");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Currently available request slots
    pub fn available(&self) -> u32 {
        self.bucket.lock().available(now())
    }

    /// Refill the bucket
    pub fn reset(&self) {
        self.bucket.lock().reset(now());
    }

    /// The configuration this limiter was built from
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }
}

/// Read the tokio clock so a paused test runtime drives refills
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Rate limiter that can be cloned across tasks
pub type SharedRateLimiter = Arc<RateLimiter>;

/// Create a shared rate limiter with custom configuration
pub fn shared_rate_limiter(config: RateLimitConfig) -> RestResult<SharedRateLimiter> {
    RateLimiter::new(config).map(Arc::new)
}
