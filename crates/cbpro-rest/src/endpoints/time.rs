//! Server time endpoint

use tracing::instrument;

use super::get_json;
use crate::error::RestResult;
use crate::transport::{Params, Transport};
use crate::types::ServerTime;

/// Server time endpoint (no authentication required)
pub struct TimeEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> TimeEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Get the exchange's current time
    #[instrument(skip(self))]
    pub async fn get(&self) -> RestResult<ServerTime> {
        get_json(self.transport, "/time", &Params::new()).await
    }
}
