//! Main public client implementation

use std::sync::Arc;
use std::time::Duration;

use cbpro_types::{Candle, RateLimitConfig, MAX_CANDLES_PER_REQUEST};
use tracing::info;

use crate::endpoints::{CurrencyEndpoints, ProductEndpoints, TimeEndpoints};
use crate::environment::Environment;
use crate::error::{HistoryError, RestError, RestResult};
use crate::history::{CandleParams, HistoryEndpoints, DEFAULT_CANDLE_THROTTLE};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Product, ServerTime};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Coinbase Pro public REST API client
///
/// Endpoint groups borrow the client's transport; the client itself is
/// cheap to clone.
///
/// # Example
///
/// ```no_run
/// use cbpro_rest::{CandleParams, PublicClient};
/// use chrono::{Duration, Utc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PublicClient::new()?;
///
///     let end = Utc::now();
///     let params = CandleParams::new(end - Duration::days(3), end, 300);
///     let candles = client.candles("BTC-USD", &params).await?;
///     println!("{} candles", candles.len());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PublicClient {
    transport: Arc<dyn Transport>,
    candle_throttle: Duration,
    max_candles: u32,
}

impl PublicClient {
    /// Create a production client with default configuration
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = HttpTransport::from_config(&config)?;
        info!(base_url = %config.base_url, "Created Coinbase Pro REST client");

        Ok(Self {
            transport: Arc::new(transport),
            candle_throttle: config.candle_throttle,
            max_candles: config.max_candles,
        })
    }

    /// Create a client over any transport (e.g., a mock or a shared one)
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            candle_throttle: DEFAULT_CANDLE_THROTTLE,
            max_candles: MAX_CANDLES_PER_REQUEST,
        }
    }

    /// Override the pause between candle window requests
    pub fn with_candle_throttle(mut self, throttle: Duration) -> Self {
        self.candle_throttle = throttle;
        self
    }

    /// Override the per-request candle limit used for planning
    pub fn with_max_candles(mut self, max_candles: u32) -> Self {
        self.max_candles = max_candles;
        self
    }

    /// Base URL of the underlying transport
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get product endpoints
    pub fn products(&self) -> ProductEndpoints<'_> {
        ProductEndpoints::new(self.transport.as_ref())
    }

    /// Get currency endpoints
    pub fn currencies(&self) -> CurrencyEndpoints<'_> {
        CurrencyEndpoints::new(self.transport.as_ref())
    }

    /// Get server time endpoint
    pub fn time(&self) -> TimeEndpoints<'_> {
        TimeEndpoints::new(self.transport.as_ref())
    }

    /// Get the multi-window candle history fetcher
    pub fn history(&self) -> HistoryEndpoints<'_> {
        HistoryEndpoints::new(self.transport.as_ref())
            .with_throttle(self.candle_throttle)
            .with_max_candles(self.max_candles)
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Fetch all candles between `params.start` and `params.end`
    ///
    /// Large ranges are split into several throttled requests.
    pub async fn candles(
        &self,
        product_id: &str,
        params: &CandleParams,
    ) -> Result<Vec<Candle>, HistoryError> {
        self.history().candles(product_id, params).await
    }

    /// List all products
    pub async fn list_products(&self) -> RestResult<Vec<Product>> {
        self.products().list().await
    }

    /// Get server time
    pub async fn server_time(&self) -> RestResult<ServerTime> {
        self.time().get().await
    }
}

impl std::fmt::Debug for PublicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicClient")
            .field("base_url", &self.base_url())
            .field("candle_throttle", &self.candle_throttle)
            .field("max_candles", &self.max_candles)
            .finish()
    }
}

/// Create a public client for `url`, or production if `None`
pub fn public_client(url: Option<&str>) -> RestResult<PublicClient> {
    let mut config = ClientConfig::default();
    if let Some(url) = url {
        config = config.with_base_url(url);
    }
    PublicClient::with_config(config)
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Pause between consecutive candle window requests
    pub candle_throttle: Duration,
    /// Per-request candle limit used when planning history fetches
    pub max_candles: u32,
    /// Shared token-bucket limit applied to every request (optional)
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Environment::default().url().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            candle_throttle: DEFAULT_CANDLE_THROTTLE,
            max_candles: MAX_CANDLES_PER_REQUEST,
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// - `CBPRO_API_URL`: base URL (takes precedence over `CBPRO_SANDBOX`)
    /// - `CBPRO_SANDBOX`: `1`/`true` selects the sandbox
    /// - `CBPRO_TIMEOUT_SECS`: request timeout
    pub fn from_env() -> RestResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RestResult<Self> {
        let mut config = Self::default();

        if let Some(flag) = lookup("CBPRO_SANDBOX") {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config = config.with_environment(Environment::Sandbox);
            }
        }

        if let Some(url) = lookup("CBPRO_API_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }

        if let Some(timeout) = lookup("CBPRO_TIMEOUT_SECS") {
            let secs = timeout.trim().parse::<u64>().map_err(|_| {
                RestError::Config(format!("CBPRO_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
            config = config.with_timeout(secs);
        }

        Ok(config)
    }

    /// Use one of the predefined environments
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.base_url = environment.url().to_string();
        self
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the pause between candle window requests
    pub fn with_candle_throttle(mut self, throttle: Duration) -> Self {
        self.candle_throttle = throttle;
        self
    }

    /// Set the per-request candle limit
    pub fn with_max_candles(mut self, max_candles: u32) -> Self {
        self.max_candles = max_candles;
        self
    }

    /// Attach a token-bucket limit to every request
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_environment(Environment::Sandbox)
            .with_candle_throttle(Duration::from_millis(500));

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.base_url, Environment::Sandbox.url());
        assert_eq!(config.candle_throttle, Duration::from_millis(500));
        assert_eq!(config.max_candles, 300);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [("CBPRO_SANDBOX", "true"), ("CBPRO_TIMEOUT_SECS", "5")]
            .into_iter()
            .collect();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.base_url, Environment::Sandbox.url());
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_config_from_lookup_url_wins() {
        let vars: HashMap<&str, &str> = [
            ("CBPRO_SANDBOX", "1"),
            ("CBPRO_API_URL", "http://localhost:8080"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_config_from_lookup_bad_timeout() {
        let result = ClientConfig::from_lookup(|k| {
            (k == "CBPRO_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(RestError::Config(_))));
    }

    #[test]
    fn test_client_with_config() {
        let client = PublicClient::with_config(
            ClientConfig::new()
                .with_base_url("http://localhost:8080/")
                .with_rate_limit(RateLimitConfig::permissive()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_rejects_zero_capacity_rate_limit() {
        let result = PublicClient::with_config(
            ClientConfig::new().with_rate_limit(RateLimitConfig::new(0, 3.0)),
        );
        assert!(matches!(result, Err(RestError::Config(_))));
    }

    #[test]
    fn test_public_client_default_url() {
        let client = public_client(None).unwrap();
        assert_eq!(client.base_url(), Environment::Production.url());
    }
}
