//! Product identifiers (BTC-USD format)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated product identifier in `BASE-QUOTE` form
///
/// Both halves are non-empty and free of further dashes. Case is kept
/// as given; the exchange uses upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId {
    id: String,
    dash: usize,
}

impl ProductId {
    /// Build from separate base and quote currencies
    pub fn from_pair(base: &str, quote: &str) -> Result<Self, ProductIdParseError> {
        format!("{base}-{quote}").parse()
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Base currency (e.g., "BTC" from "BTC-USD")
    pub fn base(&self) -> &str {
        &self.id[..self.dash]
    }

    /// Quote currency (e.g., "USD" from "BTC-USD")
    pub fn quote(&self) -> &str {
        &self.id[self.dash + 1..]
    }
}

impl FromStr for ProductId {
    type Err = ProductIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdParseError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        let Some(dash) = id.find('-') else {
            return Err(ProductIdParseError::MissingDash(id));
        };

        let (base, quote) = (&id[..dash], &id[dash + 1..]);
        if base.is_empty() || quote.is_empty() {
            return Err(ProductIdParseError::EmptyPart(id));
        }
        if quote.contains('-') || id.chars().any(char::is_whitespace) {
            return Err(ProductIdParseError::InvalidFormat(id));
        }

        Ok(Self { id, dash })
    }
}

impl From<ProductId> for String {
    fn from(product: ProductId) -> Self {
        product.id
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

/// Error parsing a product id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductIdParseError {
    #[error("Product id must contain '-': {0:?}")]
    MissingDash(String),

    #[error("Invalid product id format: {0:?}")]
    InvalidFormat(String),

    #[error("Product id has empty base or quote: {0:?}")]
    EmptyPart(String),
}
