//! HTTP transport abstraction
//!
//! Endpoint code talks to a [`Transport`] instead of `reqwest` directly,
//! so request sequencing can be unit tested without network calls.
//!
//! # Example
//!
//! ```no_run
//! use cbpro_rest::transport::{HttpTransport, Params, Transport};
//! use cbpro_rest::Environment;
//!
//! async fn example() -> cbpro_rest::RestResult<()> {
//!     let transport = HttpTransport::new(Environment::Production.url())?;
//!     let time = transport.get("/time", &Params::new()).await?;
//!     println!("Server time: {}", time);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::ClientConfig;
use crate::error::{RestError, RestResult};
use crate::rate_limiter::SharedRateLimiter;

/// Query parameters, kept sorted so requests are reproducible
pub type Params = BTreeMap<String, String>;

/// Response header carrying the cursor for older results
pub const CB_AFTER: &str = "cb-after";

/// Response header carrying the cursor for newer results
pub const CB_BEFORE: &str = "cb-before";

/// One response body plus its pagination cursors
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Decoded JSON body
    pub body: Value,
    /// Cursor for the next (older) page, from `CB-AFTER`
    pub after: Option<String>,
    /// Cursor for the previous (newer) page, from `CB-BEFORE`
    pub before: Option<String>,
}

impl Page {
    /// A page without cursors
    pub fn new(body: Value) -> Self {
        Self {
            body,
            after: None,
            before: None,
        }
    }

    /// Set the `after` cursor
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

/// Trait for the HTTP GET transport used by every endpoint
///
/// Implementations must fail with a [`RestError`] on non-success status,
/// network failure, or an undecodable body. No retries, no caching.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with query `params`, returning the response with cursors
    async fn get_page(&self, path: &str, params: &Params) -> RestResult<Page>;

    /// GET `path` with query `params`, returning only the JSON body
    async fn get(&self, path: &str, params: &Params) -> RestResult<Value> {
        Ok(self.get_page(path, params).await?.body)
    }

    /// Base URL requests are made against
    fn base_url(&self) -> &str;
}

/// Real transport using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    limiter: Option<SharedRateLimiter>,
}

impl HttpTransport {
    /// Create a transport with default client settings
    pub fn new(base_url: impl Into<String>) -> RestResult<Self> {
        Self::from_config(&ClientConfig::new().with_base_url(base_url))
    }

    /// Create a transport from client configuration
    pub fn from_config(config: &ClientConfig) -> RestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| RestError::Config(format!("failed to build HTTP client: {e}")))?;

        let mut transport = Self::with_client(client, config.base_url.clone());
        if let Some(rate_limit) = config.rate_limit {
            transport.limiter = Some(crate::rate_limiter::shared_rate_limiter(rate_limit)?);
        }
        Ok(transport)
    }

    /// Wrap an existing `reqwest` client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: None,
        }
    }

    /// Share a rate limiter with other transports or tasks
    pub fn with_rate_limiter(mut self, limiter: SharedRateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// The attached rate limiter, if any
    pub fn rate_limiter(&self) -> Option<&SharedRateLimiter> {
        self.limiter.as_ref()
    }
}

const DEFAULT_USER_AGENT: &str = concat!("cbpro-rest/", env!("CARGO_PKG_VERSION"));

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, params), fields(base = %self.base_url))]
    async fn get_page(&self, path: &str, params: &Params) -> RestResult<Page> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(?params, "GET {}", url);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let after = header_value(response.headers(), CB_AFTER);
        let before = header_value(response.headers(), CB_BEFORE);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = RestError::from_status(status.as_u16(), &bytes);
            warn!(%status, "Request to {} failed: {}", path, err);
            return Err(err);
        }

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| RestError::Parse(format!("{path}: {e}")))?;

        Ok(Page {
            body,
            after,
            before,
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A request observed by [`MockTransport`]
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path
    pub path: String,
    /// Query parameters
    pub params: Params,
    /// When the request was issued (tokio clock, so paused tests see virtual time)
    pub at: tokio::time::Instant,
}

/// Mock transport for testing
///
/// Returns queued responses in order and records every request.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockTransport {
    base_url: String,
    responses: parking_lot::Mutex<std::collections::VecDeque<RestResult<Page>>>,
    requests: parking_lot::Mutex<Vec<RecordedRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self {
            base_url: "https://mock.test".to_string(),
            responses: parking_lot::Mutex::new(std::collections::VecDeque::new()),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Queue a JSON body to be returned
    pub fn push_json(&self, body: Value) {
        self.push_page(Page::new(body));
    }

    /// Queue a page (body plus cursors) to be returned
    pub fn push_page(&self, page: Page) {
        self.responses.lock().push_back(Ok(page));
    }

    /// Queue an error to be returned
    pub fn push_error(&self, error: RestError) {
        self.responses.lock().push_back(Err(error));
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of queued responses not yet consumed
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Transport for MockTransport {
    async fn get_page(&self, path: &str, params: &Params) -> RestResult<Page> {
        self.requests.lock().push(RecordedRequest {
            path: path.to_string(),
            params: params.clone(),
            at: tokio::time::Instant::now(),
        });

        self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(RestError::Status {
                status: 404,
                message: format!("no mock response queued for {path}"),
            })
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
