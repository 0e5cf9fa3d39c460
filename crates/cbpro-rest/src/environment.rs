//! REST API environments

use std::fmt;

/// Coinbase Pro REST API environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live market data (default)
    #[default]
    Production,
    /// Public sandbox with simulated markets
    Sandbox,
}

impl Environment {
    /// Get the base URL for this environment
    pub fn url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.pro.coinbase.com",
            Self::Sandbox => "https://api-public.sandbox.pro.coinbase.com",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}
