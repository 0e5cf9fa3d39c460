//! End-to-end tests for the public client over an in-process exchange
//!
//! No network access; see `live_api.rs` for tests against the real API.

mod common;

use std::sync::Arc;
use std::time::Duration;

use cbpro_rest::{CandleParams, HistoryError, PublicClient, RestError};
use cbpro_types::RequestWindow;
use chrono::{TimeZone, Utc};
use common::*;

fn client(exchange: &Arc<FakeExchange>) -> PublicClient {
    PublicClient::with_transport(exchange.clone()).with_candle_throttle(Duration::ZERO)
}

fn params(start: i64, end: i64, granularity: u32) -> CandleParams {
    CandleParams::new(
        Utc.timestamp_opt(start, 0).unwrap(),
        Utc.timestamp_opt(end, 0).unwrap(),
        granularity,
    )
}

// =============================================================================
// Candle history
// =============================================================================

#[tokio::test]
async fn test_three_days_of_five_minute_candles() {
    let exchange = Arc::new(FakeExchange::new());
    let client = client(&exchange);

    let candles = client
        .candles("BTC-USD", &params(JAN_1_2021, JAN_1_2021 + 3 * 86_400, 300))
        .await
        .unwrap();

    // 864 candles need three windows of at most 300
    assert_eq!(candles.len(), 864);
    assert_eq!(exchange.requests().len(), 3);
    assert!(candles.windows(2).all(|w| w[0].time + 300 == w[1].time));
    assert_eq!(candles[0].time, JAN_1_2021);
    assert_eq!(candles[863].time, JAN_1_2021 + 3 * 86_400 - 300);
}

#[tokio::test]
async fn test_windows_cover_the_range_contiguously() {
    let exchange = Arc::new(FakeExchange::new());
    let client = client(&exchange);

    client
        .candles("ETH-USD", &params(JAN_1_2021, JAN_1_2021 + 50_000, 60))
        .await
        .unwrap();

    let requests = exchange.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|(path, _)| path == "/products/ETH-USD/candles"));

    assert_eq!(requests[0].1["start"], "2021-01-01T00:00:00Z");
    for pair in requests.windows(2) {
        assert_eq!(pair[0].1["end"], pair[1].1["start"]);
    }
    assert_eq!(requests[2].1["end"], "2021-01-01T13:53:20Z");
}

#[tokio::test]
async fn test_server_error_reports_failing_window() {
    let exchange = Arc::new(FakeExchange::failing_from(JAN_1_2021 + 18_000));
    let client = client(&exchange);

    let err = client
        .candles("BTC-USD", &params(JAN_1_2021, JAN_1_2021 + 54_000, 60))
        .await
        .unwrap_err();

    assert_eq!(
        err.window(),
        Some(RequestWindow::new(JAN_1_2021 + 18_000, JAN_1_2021 + 36_000))
    );
    assert!(!err.is_validation());
    assert!(err.to_string().contains("Internal server error"));
    assert_eq!(exchange.requests().len(), 2);
}

#[tokio::test]
async fn test_validation_happens_before_any_request() {
    let exchange = Arc::new(FakeExchange::new());
    let client = client(&exchange);

    let inverted = client
        .candles("BTC-USD", &params(JAN_1_2021 + 1, JAN_1_2021, 60))
        .await
        .unwrap_err();
    assert!(matches!(inverted, HistoryError::InvalidRange { .. }));

    let bad_granularity = client
        .candles("BTC-USD", &params(JAN_1_2021, JAN_1_2021 + 60, 7))
        .await
        .unwrap_err();
    assert!(matches!(bad_granularity, HistoryError::InvalidGranularity { value: 7 }));

    assert!(exchange.requests().is_empty());
}

#[tokio::test]
async fn test_single_request_history_passes_through() {
    let exchange = Arc::new(FakeExchange::new());
    let client = client(&exchange);

    let candles = client
        .products()
        .history("BTC-USD", &params(JAN_1_2021, JAN_1_2021 + 600, 60))
        .await
        .unwrap();

    // Exchange order, newest first
    assert_eq!(candles.len(), 10);
    assert!(candles[0].time > candles[9].time);
}

// =============================================================================
// Other endpoints
// =============================================================================

#[tokio::test]
async fn test_server_time_and_products() {
    let exchange = Arc::new(FakeExchange::new());
    let client = client(&exchange);

    let time = client.server_time().await.unwrap();
    assert_eq!(time.datetime().map(|dt| dt.timestamp()), Some(JAN_1_2021));

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert!(products[0].is_tradable());
}

#[tokio::test]
async fn test_unknown_path_is_status_error() {
    let exchange = Arc::new(FakeExchange::new());
    let client = client(&exchange);

    let err = client.currencies().get("XYZ").await.unwrap_err();
    assert!(matches!(err, RestError::Status { status: 404, .. }));
    assert!(!err.is_retryable());
    assert_eq!(client.base_url(), "fake://exchange");
}
