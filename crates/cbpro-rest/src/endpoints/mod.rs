//! API endpoint implementations
//!
//! Every group is a thin borrow of a [`Transport`] built on [`get_json`].

pub mod currencies;
pub mod products;
pub mod time;

pub use currencies::CurrencyEndpoints;
pub use products::{ProductEndpoints, TradeParams};
pub use time::TimeEndpoints;

use serde::de::DeserializeOwned;

use crate::error::{RestError, RestResult};
use crate::transport::{Params, Transport};

/// GET a resource and decode it into `R`
pub async fn get_json<R: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
    params: &Params,
) -> RestResult<R> {
    let value = transport.get(path, params).await?;
    serde_json::from_value(value).map_err(|e| RestError::Parse(format!("{path}: {e}")))
}

/// Path for a product-scoped resource, e.g. `/products/BTC-USD/ticker`
pub(crate) fn product_path(product_id: &str, resource: &str) -> String {
    if resource.is_empty() {
        format!("/products/{product_id}")
    } else {
        format!("/products/{product_id}/{resource}")
    }
}
