//! Shared fixtures for cbpro-rest integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cbpro_rest::{Page, Params, RestError, RestResult, Transport};
use chrono::DateTime;
use parking_lot::Mutex;
use serde_json::{json, Value};

pub const JAN_1_2021: i64 = 1_609_459_200;

/// In-process stand-in for the public API
///
/// Candle requests are answered from their own `start`/`end`/`granularity`
/// query, newest first and end-exclusive, the way the exchange buckets them.
/// Every request is logged.
#[derive(Default)]
pub struct FakeExchange {
    log: Mutex<Vec<(String, Params)>>,
    fail_candles_from: Option<i64>,
}

impl FakeExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer 500 to any candle window starting at or after `start`
    pub fn failing_from(start: i64) -> Self {
        Self {
            fail_candles_from: Some(start),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<(String, Params)> {
        self.log.lock().clone()
    }

    fn candles(&self, params: &Params) -> RestResult<Value> {
        let start = parse_time(params, "start")?;
        let end = parse_time(params, "end")?;
        let granularity: i64 = params
            .get("granularity")
            .and_then(|g| g.parse().ok())
            .ok_or_else(|| RestError::from_status(400, br#"{"message":"invalid granularity"}"#))?;

        if self.fail_candles_from.is_some_and(|from| start >= from) {
            return Err(RestError::from_status(500, br#"{"message":"Internal server error"}"#));
        }

        let mut rows = Vec::new();
        let mut time = start;
        while time < end {
            rows.push(json!([time, "100.0", "101.5", "100.25", "101.0", "12.5"]));
            time += granularity;
        }
        rows.reverse();
        Ok(Value::Array(rows))
    }
}

fn parse_time(params: &Params, key: &str) -> RestResult<i64> {
    params
        .get(key)
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.timestamp())
        .ok_or_else(|| RestError::from_status(400, br#"{"message":"invalid time"}"#))
}

#[async_trait]
impl Transport for FakeExchange {
    async fn get_page(&self, path: &str, params: &Params) -> RestResult<Page> {
        self.log.lock().push((path.to_string(), params.clone()));

        let body = match path {
            "/time" => json!({"iso": "2021-01-01T00:00:00.000Z", "epoch": 1609459200.0}),
            "/products" => json!([
                {
                    "id": "BTC-USD",
                    "base_currency": "BTC",
                    "quote_currency": "USD",
                    "base_increment": "0.00000001",
                    "quote_increment": "0.01",
                    "status": "online"
                }
            ]),
            p if p.ends_with("/candles") => self.candles(params)?,
            other => {
                let body = format!(r#"{{"message":"NotFound {other}"}}"#);
                return Err(RestError::from_status(404, body.as_bytes()));
            }
        };

        Ok(Page::new(body))
    }

    fn base_url(&self) -> &str {
        "fake://exchange"
    }
}
