//! Executing an `HttpRequest` over the network.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. It returns the response as
//! data whatever its status; deciding what a 4xx/5xx means is left to
//! `Resource::parse_response`. `UreqTransport` is the default implementation
//! and disables ureq's status-as-error behaviour for that reason.

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Sends one request and reports what came back. Implementations must not
/// retry.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
    max_body: u64,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
            max_body: config.max_body.unwrap_or(u64::MAX),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut headers = request.headers.clone();
        if !request.has_header("user-agent") {
            headers.push(("user-agent".to_string(), self.user_agent.clone()));
        }

        let url = request.url.as_str();
        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), &headers).call(),
            HttpMethod::Head => with_headers(self.agent.head(url), &headers).call(),
            HttpMethod::Options => with_headers(self.agent.options(url), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(url), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(url), &headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(url), &headers), body),
        };

        let mut response = result.map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // ureq caps bodies at 10 MiB unless told otherwise.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.max_body)
            .read_to_vec()
            .map_err(map_ureq_error)?;

        // A zero-length payload is still a body; decoding it fails later.
        Ok(HttpResponse {
            status,
            headers,
            body: Some(bytes),
        })
    }
}

/// Append every header; `ureq` keeps duplicates as separate header lines.
fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Http(e) => TransportError::InvalidRequest(e.to_string()),
        ureq::Error::BadUri(msg) => TransportError::InvalidRequest(msg),
        other => TransportError::Io(other.to_string()),
    }
}
