//! Response types for the public REST endpoints

use cbpro_types::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Products
// ============================================================================

/// Tradable product (currency pair)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id (e.g., "BTC-USD")
    pub id: String,
    /// Human-readable name (e.g., "BTC/USD")
    #[serde(default)]
    pub display_name: Option<String>,
    /// Base currency
    pub base_currency: String,
    /// Quote currency
    pub quote_currency: String,
    /// Order size increment in base currency
    pub base_increment: Decimal,
    /// Price increment in quote currency
    pub quote_increment: Decimal,
    /// Minimum order size in base currency
    #[serde(default)]
    pub base_min_size: Option<Decimal>,
    /// Maximum order size in base currency
    #[serde(default)]
    pub base_max_size: Option<Decimal>,
    /// Minimum market order funds in quote currency
    #[serde(default)]
    pub min_market_funds: Option<Decimal>,
    /// Maximum market order funds in quote currency
    #[serde(default)]
    pub max_market_funds: Option<Decimal>,
    /// Trading status ("online", "offline", "delisted", ...)
    pub status: String,
    /// Extra status detail
    #[serde(default)]
    pub status_message: Option<String>,
    /// Only cancels accepted
    #[serde(default)]
    pub cancel_only: bool,
    /// Only limit orders accepted
    #[serde(default)]
    pub limit_only: bool,
    /// Only post-only orders accepted
    #[serde(default)]
    pub post_only: bool,
    /// Trading disabled entirely
    #[serde(default)]
    pub trading_disabled: bool,
}

impl Product {
    /// Check if the product can currently be traded
    pub fn is_tradable(&self) -> bool {
        self.status == "online" && !self.trading_disabled && !self.cancel_only
    }
}

/// Last trade, best bid/ask, and 24h volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Id of the last trade
    pub trade_id: u64,
    /// Last trade price
    pub price: Decimal,
    /// Last trade size
    pub size: Decimal,
    /// Best bid
    pub bid: Decimal,
    /// Best ask
    pub ask: Decimal,
    /// 24h volume in base currency
    pub volume: Decimal,
    /// Time of the last trade
    pub time: DateTime<Utc>,
}

impl Ticker {
    /// Get the mid price (average of bid and ask)
    pub fn mid_price(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Get spread in basis points
    pub fn spread_bps(&self) -> Option<Decimal> {
        let mid = self.mid_price();
        if mid.is_zero() {
            return None;
        }
        Some((self.ask - self.bid) / mid * Decimal::from(10000))
    }
}

/// Executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution time
    pub time: DateTime<Utc>,
    /// Trade id (also the pagination cursor)
    pub trade_id: u64,
    /// Execution price
    pub price: Decimal,
    /// Execution size
    pub size: Decimal,
    /// Maker order side
    pub side: Side,
}

/// 24 hour statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    /// Open price 24 hours ago
    pub open: Decimal,
    /// 24h high
    pub high: Decimal,
    /// 24h low
    pub low: Decimal,
    /// 24h volume
    pub volume: Decimal,
    /// Last trade price
    #[serde(default)]
    pub last: Option<Decimal>,
    /// 30 day volume
    #[serde(default)]
    pub volume_30day: Option<Decimal>,
}

impl ProductStats {
    /// Percent change from open to last, if a last price is present
    pub fn change_pct(&self) -> Option<Decimal> {
        let last = self.last?;
        if self.open.is_zero() {
            return None;
        }
        Some((last - self.open) / self.open * Decimal::ONE_HUNDRED)
    }
}

// ============================================================================
// Order book
// ============================================================================

/// One order book row
///
/// Levels 1 and 2 send `[price, size, num_orders]`; level 3 sends
/// `[price, size, order_id]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry(pub Decimal, pub Decimal, pub Value);

impl BookEntry {
    /// Price of this row
    pub fn price(&self) -> Decimal {
        self.0
    }

    /// Size at this price (or of this order, for level 3)
    pub fn size(&self) -> Decimal {
        self.1
    }

    /// Number of orders aggregated at this price (levels 1 and 2)
    pub fn num_orders(&self) -> Option<u64> {
        self.2.as_u64()
    }

    /// Order id (level 3)
    pub fn order_id(&self) -> Option<&str> {
        self.2.as_str()
    }
}

/// Order book snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Book sequence number
    pub sequence: u64,
    /// Bid rows, best first
    pub bids: Vec<BookEntry>,
    /// Ask rows, best first
    pub asks: Vec<BookEntry>,
}

impl OrderBook {
    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(BookEntry::price)
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(BookEntry::price)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

// ============================================================================
// Currencies and time
// ============================================================================

/// Currency known to the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Currency code (may be non-ISO 4217 for crypto assets)
    pub id: String,
    /// Full name
    pub name: String,
    /// Smallest transferable amount
    pub min_size: Decimal,
    /// Status ("online", ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Status message
    #[serde(default)]
    pub message: Option<String>,
    /// Maximum precision
    #[serde(default)]
    pub max_precision: Option<Decimal>,
    /// Network and display details, passed through untouched
    #[serde(default)]
    pub details: Option<Value>,
}

/// Server time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTime {
    /// ISO-8601 timestamp
    pub iso: String,
    /// Decimal seconds since the Unix epoch
    pub epoch: f64,
}

impl ServerTime {
    /// Parse the ISO timestamp
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.iso)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
