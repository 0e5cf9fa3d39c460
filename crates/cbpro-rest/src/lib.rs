//! Public market data REST client for Coinbase Pro
//!
//! This crate covers the unauthenticated half of the Coinbase Pro REST
//! API: products, order books, tickers, trades, statistics, currencies,
//! server time and candle history.
//!
//! # Features
//!
//! - **Candle History**: Arbitrary time ranges, split into 300-candle windows
//! - **Market Data**: Ticker, order book, recent trades, 24h stats
//! - **Reference Data**: Products, currencies, server time
//! - **Pagination**: `CB-AFTER` cursors followed automatically
//!
//! # Example
//!
//! ```no_run
//! use cbpro_rest::{CandleParams, PublicClient};
//! use cbpro_types::BookLevel;
//! use chrono::{TimeZone, Utc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PublicClient::new()?;
//!
//!     let ticker = client.products().ticker("BTC-USD").await?;
//!     println!("BTC-USD: {}", ticker.price);
//!
//!     let book = client.products().order_book("BTC-USD", BookLevel::Best).await?;
//!     println!("Spread: {:?}", book.spread());
//!
//!     // Three days of 5 minute candles (864 candles, 3 requests)
//!     let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
//!     let end = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
//!     let candles = client.candles("BTC-USD", &CandleParams::new(start, end, 300)).await?;
//!     println!("{} candles", candles.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! Public endpoints allow about 3 requests per second per IP, with bursts
//! up to 6. Candle history pauses [`DEFAULT_CANDLE_THROTTLE`] between
//! windows. For a limit shared by every request, set
//! [`ClientConfig::with_rate_limit`].

pub mod client;
pub mod endpoints;
pub mod environment;
pub mod error;
pub mod history;
pub mod pagination;
pub mod rate_limiter;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{public_client, ClientConfig, PublicClient};
pub use environment::Environment;
pub use error::{HistoryError, RestError, RestResult};
pub use history::{CandleParams, HistoryEndpoints, DEFAULT_CANDLE_THROTTLE};
pub use pagination::paginate;
pub use rate_limiter::{shared_rate_limiter, RateLimiter, SharedRateLimiter};
pub use transport::{HttpTransport, Page, Params, Transport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::{MockTransport, RecordedRequest};

// Re-export endpoint-specific types
pub use endpoints::TradeParams;
pub use types::{BookEntry, Currency, OrderBook, Product, ProductStats, ServerTime, Ticker, Trade};
