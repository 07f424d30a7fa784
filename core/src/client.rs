//! The caller-owned transport handle.
//!
//! # Design
//! `Client` pairs an immutable `ClientConfig` with a transport. It carries no
//! mutable state between calls, so one instance can be shared by reference
//! across threads and tasks; connection reuse lives inside the transport.
//! Swapping the transport (e.g. for a scripted one in tests) leaves request
//! building and response decoding untouched.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::HttpTransport;

/// Connection configuration plus the transport that executes requests.
#[derive(Debug, Clone)]
pub struct Client<X = HttpTransport> {
    config: ClientConfig,
    transport: X,
}

impl Client<HttpTransport> {
    /// Build a client backed by the real network transports.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// Default settings for `base_url`.
    pub fn connect(base_url: &str) -> Result<Self, ApiError> {
        Self::new(ClientConfig::new(base_url)?)
    }
}

impl<X> Client<X> {
    pub fn with_transport(config: ClientConfig, transport: X) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub fn is_strict(&self) -> bool {
        self.config.raise_on_unexpected_status()
    }
}
