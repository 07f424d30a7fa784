//! Typed client core for the Sentinel review backend.
//!
//! # Overview
//! Every API operation is an [`Endpoint`] constant: a method, a path
//! template and a table mapping status codes to a decoding rule. One generic
//! dispatcher renders the request, sends it through the caller's [`Client`]
//! and decodes the response into an [`Envelope`].
//!
//! # Design
//! - Request building and response decoding are pure functions over plain
//!   `HttpRequest` / `HttpResponse` values; only the transport does I/O.
//! - Both blocking ([`dispatch`]) and async ([`dispatch_async`]) call shapes
//!   share those functions, so they decode identically.
//! - A documented "no content" status yields `Some(Decoded::Empty)`; an
//!   undocumented status yields `None` (lenient) or
//!   `ApiError::UnexpectedStatus` (strict).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use dispatch::{build_request, call, call_async, dispatch, dispatch_async, parse_response};
pub use endpoint::{Decode, Endpoint, Params};
pub use envelope::{Decoded, Envelope};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{AsyncTransport, HttpTransport, Transport};
pub use types::{CreateProject, Message, RunExecution, ToolCall, ToolRequest};
