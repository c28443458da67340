//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! The client core never performs I/O itself; a `Transport` sits between
//! `build_*` and `parse_*`. Non-2xx statuses come back as data so the client
//! decides what they mean. Only a failure to complete the round-trip at all
//! is an error here.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured so 4xx/5xx responses are returned as data rather
/// than `Err`, and every request is bounded by one global timeout.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let path = request.path.as_str();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(path), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(path), &request.headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(path), &request.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(path), &request.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Patch => {
                let builder = with_headers(self.agent.patch(path), &request.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_ureq_error)?;

        debug!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Network(other.to_string()),
    }
}
