//! Single HTTP exchanges over the network.
//!
//! # Design
//! A `Transport` performs exactly one request and reports whatever status the
//! server answered with; retrying is `Session`'s job. Keeping the trait this
//! small lets tests substitute a scripted transport for the network.

use std::fmt;

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one GET exchange.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Transport backed by a `ureq::Agent`.
///
/// The agent owns a connection pool that is reused across calls and is safe
/// to share between threads; clone the transport to share the pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        // Status codes are data here: Session decides which ones are errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let transport_error = |source: ureq::Error| ApiError::Transport {
            url: request.url.clone(),
            source: Box::new(source),
        };

        let mut builder = self.agent.get(&request.url);
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        let mut response = builder.call().map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string().map_err(transport_error)?;

        debug!(url = %request.url, status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
