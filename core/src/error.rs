//! Error types for the Sentinel API client.
//!
//! # Design
//! `TransportError` is what a transport returns when no HTTP response was
//! obtained at all; the dispatcher wraps it in `ApiError::Transport` without
//! inspecting it. `UnexpectedStatus` is the only error the dispatcher
//! synthesizes from a successful exchange, and only when the client runs in
//! strict mode. Everything else is a request-building or decoding failure.

/// Boxed error carried through from the underlying HTTP library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to complete an HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The configured timeout elapsed before a response arrived.
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// The connection could not be established (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// Any other I/O or protocol failure.
    #[error("transport error: {0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Errors returned by the endpoint dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A placeholder in the path template had no value.
    #[error("missing path parameter `{0}`")]
    MissingPathParam(String),

    /// The path template has an unterminated or empty placeholder.
    #[error("invalid path template `{0}`")]
    InvalidPathTemplate(String),

    /// The base URL joined with the rendered path is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configuration value is missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configured header name or value is not valid HTTP.
    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The exchange itself failed; nothing was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Strict mode: the server answered with a status the endpoint does not
    /// document.
    #[error("unexpected status {status}: {}", String::from_utf8_lossy(.body))]
    UnexpectedStatus { status: u16, body: Vec<u8> },

    /// The body of a documented status could not be decoded.
    #[error("malformed response for status {status}: {source}")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Status code of the response that caused this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. }
            | ApiError::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
