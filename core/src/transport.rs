//! The transport seam: the only place where requests meet the network.
//!
//! # Design
//! The dispatcher never performs I/O itself. It hands a fully built
//! `HttpRequest` to a `Transport` (blocking) or an `AsyncTransport`
//! (suspending) and decodes whatever `HttpResponse` comes back. Any status
//! code is a successful exchange at this layer; only a failure to obtain a
//! response at all is a `TransportError`.
//!
//! `HttpTransport` implements both traits: a `ureq::Agent` serves blocking
//! callers and a `reqwest::Client` serves async callers. Both pool
//! connections internally and are configured from the same `ClientConfig`,
//! so the two call shapes behave the same on the wire.

use std::fmt;
use std::future::Future;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Redirect hops followed when redirects are enabled.
const MAX_REDIRECTS: u32 = 10;

/// Performs one HTTP exchange, blocking the calling thread.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Performs one HTTP exchange, yielding at the I/O boundary.
pub trait AsyncTransport {
    fn send_async(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Real network transport for both call shapes.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .max_redirects(if config.follow_redirects() { MAX_REDIRECTS } else { 0 })
            .build()
            .new_agent();

        let redirect = if config.follow_redirects() {
            reqwest::redirect::Policy::limited(MAX_REDIRECTS as usize)
        } else {
            reqwest::redirect::Policy::none()
        };
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(redirect)
            .build()
            .map_err(|e| TransportError::Other(Box::new(e)))?;

        Ok(Self { agent, client })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending blocking request");

        let url = request.url.as_str();
        let headers = &request.headers;
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            // ureq only sends a GET/DELETE body when forced to.
            (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
        };
        let mut response = result.map_err(classify_ureq)?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        // ureq caps bodies at 10 MiB by default; reqwest does not cap at all.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify_ureq)?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, headers, body })
    }
}

impl AsyncTransport for HttpTransport {
    async fn send_async(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending async request");

        let mut builder = self.client.request(request.method.into(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send().await.map_err(classify_reqwest)?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(classify_reqwest)?.to_vec();

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, headers, body })
    }
}

/// Every header, in wire order. Non-UTF-8 values are kept, lossily decoded.
fn collect_headers(map: &ureq::http::HeaderMap) -> Vec<(String, String)> {
    map.iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), value)
        })
        .collect()
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

fn classify_ureq(err: ureq::Error) -> TransportError {
    let io_kind = match &err {
        ureq::Error::Io(io) => Some(io.kind()),
        _ => None,
    };
    if matches!(err, ureq::Error::Timeout(_)) || io_kind == Some(std::io::ErrorKind::TimedOut) {
        TransportError::Timeout(Box::new(err))
    } else if matches!(err, ureq::Error::HostNotFound | ureq::Error::ConnectionFailed)
        || io_kind == Some(std::io::ErrorKind::ConnectionRefused)
    {
        TransportError::Connect(Box::new(err))
    } else {
        TransportError::Other(Box::new(err))
    }
}

fn classify_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(Box::new(err))
    } else if err.is_connect() {
        TransportError::Connect(Box::new(err))
    } else {
        TransportError::Other(Box::new(err))
    }
}
