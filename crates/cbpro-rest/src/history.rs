//! Historical candles over arbitrary time ranges
//!
//! The candles endpoint serves at most 300 candles per request. The
//! fetcher plans the requested range into windows with
//! [`IntervalPlan`], requests them one at a time with a fixed pause in
//! between, and returns the merged candles in ascending time order.
//!
//! A failed window aborts the whole fetch: no partial series is returned.
//!
//! Neighbouring windows share their boundary second. If the exchange
//! returns the boundary candle in both windows it appears twice in the
//! result; candles are sorted but not deduplicated.

use std::time::Duration;

use cbpro_types::{
    to_iso8601, Candle, Granularity, IntervalPlan, RequestWindow, TimeRange,
    MAX_CANDLES_PER_REQUEST,
};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, instrument};

use crate::endpoints::{get_json, product_path};
use crate::error::{HistoryError, RestError, RestResult};
use crate::transport::{Params, Transport};

/// Default pause between window requests
///
/// Public endpoints allow roughly 4 requests per second; 260ms keeps a
/// single fetch just under that.
pub const DEFAULT_CANDLE_THROTTLE: Duration = Duration::from_millis(260);

/// Caller-facing candle request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleParams {
    /// Range start (inclusive)
    pub start: DateTime<Utc>,
    /// Range end (inclusive)
    pub end: DateTime<Utc>,
    /// Candle duration in seconds; must be one of [`Granularity::all`]
    pub granularity: u32,
}

impl CandleParams {
    /// Create candle parameters
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, granularity: u32) -> Self {
        Self {
            start,
            end,
            granularity,
        }
    }

    /// The requested range in whole seconds
    pub fn range(&self) -> TimeRange {
        TimeRange::from_datetimes(self.start, self.end)
    }

    /// Query string for a single, unsplit request
    pub(crate) fn to_query(&self) -> Params {
        let mut params = Params::new();
        params.insert("start".to_string(), self.start.to_rfc3339_opts(SecondsFormat::Secs, true));
        params.insert("end".to_string(), self.end.to_rfc3339_opts(SecondsFormat::Secs, true));
        params.insert("granularity".to_string(), self.granularity.to_string());
        params
    }
}

/// Multi-window candle fetcher
pub struct HistoryEndpoints<'a> {
    transport: &'a dyn Transport,
    throttle: Duration,
    max_candles: u32,
}

impl<'a> HistoryEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            throttle: DEFAULT_CANDLE_THROTTLE,
            max_candles: MAX_CANDLES_PER_REQUEST,
        }
    }

    /// Set the pause between consecutive window requests
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set the per-request candle limit used for planning
    pub fn with_max_candles(mut self, max_candles: u32) -> Self {
        self.max_candles = max_candles;
        self
    }

    /// Fetch every candle between `params.start` and `params.end`
    ///
    /// Granularity and range are validated before any request is sent.
    #[instrument(skip(self, params), fields(granularity = params.granularity))]
    pub async fn candles(
        &self,
        product_id: &str,
        params: &CandleParams,
    ) -> Result<Vec<Candle>, HistoryError> {
        let granularity = Granularity::try_from(params.granularity)?;
        self.candles_in_range(product_id, params.range(), granularity).await
    }

    /// Fetch every candle in `range` at the given granularity
    #[instrument(skip(self), fields(start = range.start, end = range.end))]
    pub async fn candles_in_range(
        &self,
        product_id: &str,
        range: TimeRange,
        granularity: Granularity,
    ) -> Result<Vec<Candle>, HistoryError> {
        let plan = IntervalPlan::with_max_candles(range, granularity, self.max_candles)?;

        // Windows lie inside the range, so checking the bounds covers them all
        for bound in [range.start, range.end] {
            if to_iso8601(bound).is_none() {
                return Err(HistoryError::InvalidTimestamp(bound));
            }
        }

        let path = product_path(product_id, "candles");
        let total = plan.len();
        debug!(
            windows = total,
            granularity = granularity.label(),
            "Fetching candle history for {}",
            product_id
        );

        let mut candles = Vec::new();
        for (index, window) in plan.windows().enumerate() {
            if index > 0 && !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }

            let batch = self
                .fetch_window(&path, window, granularity)
                .await
                .map_err(|source| HistoryError::Transport { window, source })?;

            debug!(
                window = %window,
                received = batch.len(),
                "Fetched window {}/{}",
                index + 1,
                total
            );
            candles.extend(batch);
        }

        // Stable: boundary duplicates keep their arrival order
        candles.sort_by_key(|candle| candle.time);

        info!(candles = candles.len(), requests = total, "Candle history complete");
        Ok(candles)
    }

    async fn fetch_window(
        &self,
        path: &str,
        window: RequestWindow,
        granularity: Granularity,
    ) -> RestResult<Vec<Candle>> {
        let params = window_query(window, granularity)?;
        get_json(self.transport, path, &params).await
    }
}

/// Query string for one window: `start`, `end` (ISO-8601) and `granularity`
fn window_query(window: RequestWindow, granularity: Granularity) -> RestResult<Params> {
    let start = window
        .start_iso8601()
        .ok_or_else(|| RestError::InvalidParameter(format!("start {} out of range", window.start)))?;
    let end = window
        .end_iso8601()
        .ok_or_else(|| RestError::InvalidParameter(format!("end {} out of range", window.end)))?;

    let mut params = Params::new();
    params.insert("start".to_string(), start);
    params.insert("end".to_string(), end);
    params.insert("granularity".to_string(), granularity.as_secs().to_string());
    Ok(params)
}
