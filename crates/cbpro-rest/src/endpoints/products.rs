//! Public product endpoints
//!
//! These endpoints don't require authentication.

use cbpro_types::{BookLevel, Candle};
use tracing::{debug, instrument};

use super::{get_json, product_path};
use crate::error::RestResult;
use crate::history::CandleParams;
use crate::pagination::paginate_as;
use crate::transport::{Params, Transport};
use crate::types::{OrderBook, Product, ProductStats, Ticker, Trade};

/// Product and per-product market data endpoints
pub struct ProductEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> ProductEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// List all available products
    #[instrument(skip(self))]
    pub async fn list(&self) -> RestResult<Vec<Product>> {
        debug!("Fetching products");
        get_json(self.transport, "/products", &Params::new()).await
    }

    /// Get a single product
    #[instrument(skip(self))]
    pub async fn get(&self, product_id: &str) -> RestResult<Product> {
        get_json(self.transport, &product_path(product_id, ""), &Params::new()).await
    }

    /// Get an order book snapshot
    ///
    /// Not paginated. Polling is discouraged, especially at
    /// [`BookLevel::Full`]; stream the book over websocket instead.
    #[instrument(skip(self))]
    pub async fn order_book(&self, product_id: &str, level: BookLevel) -> RestResult<OrderBook> {
        let mut params = Params::new();
        params.insert("level".to_string(), level.as_u8().to_string());

        debug!("Fetching level {} order book for {}", level.as_u8(), product_id);
        get_json(self.transport, &product_path(product_id, "book"), &params).await
    }

    /// Get the ticker (last trade, best bid/ask, 24h volume)
    #[instrument(skip(self))]
    pub async fn ticker(&self, product_id: &str) -> RestResult<Ticker> {
        get_json(self.transport, &product_path(product_id, "ticker"), &Params::new()).await
    }

    /// Get recent trades, newest first, following pagination cursors
    #[instrument(skip(self))]
    pub async fn trades(&self, product_id: &str, params: &TradeParams) -> RestResult<Vec<Trade>> {
        let path = product_path(product_id, "trades");
        paginate_as(self.transport, &path, &params.to_query(), params.max_trades).await
    }

    /// Get candles with a single request
    ///
    /// The parameters are passed through untouched, so the exchange
    /// rejects ranges of more than 300 candles. Use
    /// [`HistoryEndpoints::candles`](crate::history::HistoryEndpoints::candles)
    /// for arbitrary ranges. Candles come back newest first.
    #[instrument(skip(self, params))]
    pub async fn history(&self, product_id: &str, params: &CandleParams) -> RestResult<Vec<Candle>> {
        get_json(self.transport, &product_path(product_id, "candles"), &params.to_query()).await
    }

    /// Get 24 hour statistics
    #[instrument(skip(self))]
    pub async fn stats(&self, product_id: &str) -> RestResult<ProductStats> {
        get_json(self.transport, &product_path(product_id, "stats"), &Params::new()).await
    }
}

/// Options for [`ProductEndpoints::trades`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeParams {
    /// Page size sent as `limit` (exchange maximum is 100)
    pub page_size: Option<u32>,
    /// Start after this trade id cursor
    pub after: Option<String>,
    /// Stop once this many trades are collected
    pub max_trades: Option<usize>,
}

impl TradeParams {
    /// Create empty trade parameters (first page onward, no cap)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Start from a cursor
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Cap the number of trades collected
    pub fn with_max_trades(mut self, max_trades: usize) -> Self {
        self.max_trades = Some(max_trades);
        self
    }

    fn to_query(&self) -> Params {
        let mut params = Params::new();
        if let Some(page_size) = self.page_size {
            params.insert("limit".to_string(), page_size.min(100).to_string());
        }
        if let Some(after) = &self.after {
            params.insert("after".to_string(), after.clone());
        }
        params
    }
}
