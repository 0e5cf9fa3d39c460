//! Currency endpoints

use tracing::instrument;

use super::get_json;
use crate::error::RestResult;
use crate::transport::{Params, Transport};
use crate::types::Currency;

/// Currency reference data
pub struct CurrencyEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> CurrencyEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// List known currencies
    ///
    /// Not every currency listed is currently tradable.
    #[instrument(skip(self))]
    pub async fn list(&self) -> RestResult<Vec<Currency>> {
        get_json(self.transport, "/currencies", &Params::new()).await
    }

    /// Get a single currency
    ///
    /// Assets without an ISO 4217 code use an exchange-specific id.
    #[instrument(skip(self))]
    pub async fn get(&self, currency_id: &str) -> RestResult<Currency> {
        get_json(self.transport, &format!("/currencies/{currency_id}"), &Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_currency() {
        let transport = MockTransport::new();
        transport.push_json(json!({"id": "USD", "name": "United States Dollar", "min_size": "0.01"}));

        let currency = CurrencyEndpoints::new(&transport).get("USD").await.unwrap();
        assert_eq!(currency.name, "United States Dollar");
        assert_eq!(transport.requests()[0].path, "/currencies/USD");
    }

    #[tokio::test]
    async fn test_list_currencies() {
        let transport = MockTransport::new();
        transport.push_json(json!([
            {"id": "BTC", "name": "Bitcoin", "min_size": "0.00000001"},
            {"id": "EUR", "name": "Euro", "min_size": "0.01"}
        ]));

        let currencies = CurrencyEndpoints::new(&transport).list().await.unwrap();
        let ids: Vec<&str> = currencies.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["BTC", "EUR"]);
    }
}
