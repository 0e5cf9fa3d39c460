//! Historical rate (candle) types with decimal precision

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One OHLCV bucket from the candles endpoint
///
/// On the wire each candle is a JSON array
/// `[time, low, high, open, close, volume]` with `time` in Unix seconds.
/// `time` is the bucket start and the only ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candle {
    /// Bucket start time (Unix seconds)
    pub time: i64,
    /// Lowest price during the bucket
    pub low: Decimal,
    /// Highest price during the bucket
    pub high: Decimal,
    /// First trade price in the bucket
    pub open: Decimal,
    /// Last trade price in the bucket
    pub close: Decimal,
    /// Base currency volume traded during the bucket
    pub volume: Decimal,
}

impl Candle {
    /// Create a new candle (argument order follows the wire format)
    pub fn new(
        time: i64,
        low: Decimal,
        high: Decimal,
        open: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            time,
            low,
            high,
            open,
            close,
            volume,
        }
    }

    /// Bucket start as a UTC datetime
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.time, 0)
    }

    /// Check if the candle closed at or above its open
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// High minus low
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}

impl<'de> Deserialize<'de> for Candle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (time, low, high, open, close, volume) =
            <(WireTime, WireDecimal, WireDecimal, WireDecimal, WireDecimal, WireDecimal)>::deserialize(
                deserializer,
            )?;

        Ok(Self {
            time: time.0,
            low: low.0,
            high: high.0,
            open: open.0,
            close: close.0,
            volume: volume.0,
        })
    }
}

impl Serialize for Candle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(6)?;
        tuple.serialize_element(&self.time)?;
        tuple.serialize_element(&self.low)?;
        tuple.serialize_element(&self.high)?;
        tuple.serialize_element(&self.open)?;
        tuple.serialize_element(&self.close)?;
        tuple.serialize_element(&self.volume)?;
        tuple.end()
    }
}

/// Candle time: integer seconds, tolerating a float with no fractional part
struct WireTime(i64);

impl<'de> Deserialize<'de> for WireTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = match Value::deserialize(deserializer)? {
            Value::Number(n) => n,
            other => return Err(D::Error::custom(format!("invalid candle time: {other}"))),
        };
        if let Some(secs) = n.as_i64() {
            return Ok(Self(secs));
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Self(f as i64)),
            _ => Err(D::Error::custom(format!("invalid candle time: {n}"))),
        }
    }
}

/// Price or volume that keeps the exchange's decimal digits
///
/// JSON numbers keep their source text (`arbitrary_precision`), which is
/// parsed straight into a [`Decimal`] without an f64 step.
struct WireDecimal(Decimal);

impl<'de> Deserialize<'de> for WireDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => return Err(D::Error::custom(format!("expected a decimal, got {other}"))),
        };

        let value = if text.contains(['e', 'E']) {
            Decimal::from_scientific(&text)
        } else {
            Decimal::from_str_exact(&text)
        };
        value.map(Self).map_err(|e| D::Error::custom(format!("invalid decimal {text:?}: {e}")))
    }
}
