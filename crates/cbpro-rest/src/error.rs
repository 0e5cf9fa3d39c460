//! Error types for REST API operations

use cbpro_types::{PlanError, RequestWindow};

/// Errors that can occur during a single REST request
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Exchange answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, or the raw body
        message: String,
    },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RestError {
    /// Build a status error from a response body
    ///
    /// The exchange reports failures as `{"message": "..."}`; any other
    /// body is kept verbatim.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: String,
        }

        let message = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    "empty response body".to_string()
                } else {
                    text
                }
            }
        };

        Self::Status { status, message }
    }

    /// HTTP status code, if the exchange returned one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Check if repeating the same request might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Http(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) | Self::InvalidParameter(_) | Self::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Errors from a multi-window candle history fetch
///
/// Validation errors are raised before any request is sent. A transport
/// error aborts the whole fetch and names the window that failed.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Range start is after range end
    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },

    /// Granularity is not one the exchange accepts
    #[error("Unsupported granularity {value}s")]
    InvalidGranularity { value: u32 },

    /// Per-request candle limit of zero
    #[error("Max candles per request must be at least 1")]
    InvalidMaxCandles,

    /// Range bound cannot be expressed as an ISO-8601 timestamp
    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    /// Request for one window failed
    #[error("Candle request for window {window} failed: {source}")]
    Transport {
        /// Window whose request failed
        window: RequestWindow,
        /// Underlying request error
        #[source]
        source: RestError,
    },
}

impl HistoryError {
    /// Window whose request failed, for transport errors
    pub fn window(&self) -> Option<RequestWindow> {
        match self {
            Self::Transport { window, .. } => Some(*window),
            _ => None,
        }
    }

    /// Check if this error was raised before any request was sent
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Transport { .. })
    }
}

impl From<PlanError> for HistoryError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::InvalidRange { start, end } => Self::InvalidRange { start, end },
            PlanError::InvalidGranularity { value } => Self::InvalidGranularity { value },
            PlanError::InvalidMaxCandles => Self::InvalidMaxCandles,
        }
    }
}
