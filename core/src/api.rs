//! Endpoint catalogue for the Sentinel backend.
//!
//! Each operation is a constant descriptor; call it with
//! [`dispatch`](crate::dispatch) or [`dispatch_async`](crate::dispatch_async).
//!
//! ```rust,ignore
//! use sentinel_core::{api, call, Client, Params};
//!
//! let client = Client::connect("http://localhost:8080")?;
//! let params = Params::new().path("review_id", review_id);
//! match call(&api::GET_REVIEW_TOOL_REQUESTS, &params, &client)? {
//!     Some(Decoded::List(requests)) => { /* ... */ }
//!     Some(Decoded::Empty) => { /* review has no tool requests */ }
//!     _ => { /* undocumented status, lenient mode */ }
//! }
//! ```

use uuid::Uuid;

use crate::endpoint::{Decode, Endpoint};
use crate::http::HttpMethod;
use crate::types::{Message, RunExecution, ToolCall, ToolRequest};

/// Tool requests attached to a review. 404 means the review has none.
pub const GET_REVIEW_TOOL_REQUESTS: Endpoint<ToolRequest> = Endpoint::new(
    HttpMethod::Get,
    "/api/reviews/{review_id}/toolrequests",
    &[(200, Decode::List), (404, Decode::Empty)],
);

pub const GET_TOOL_CALL: Endpoint<ToolCall> = Endpoint::new(
    HttpMethod::Get,
    "/api/tool_call/{tool_call_id}",
    &[(200, Decode::Single), (404, Decode::Empty)],
);

pub const GET_TOOL_CALL_STATE: Endpoint<RunExecution> = Endpoint::new(
    HttpMethod::Get,
    "/api/tool_call/{tool_call_id}/state",
    &[(200, Decode::Single), (404, Decode::Empty)],
);

pub const GET_RUN_MESSAGES: Endpoint<Message> =
    Endpoint::new(HttpMethod::Get, "/api/run/{run_id}/messages", &[(200, Decode::List)]);

/// Register a project; body is a `CreateProject`, response is the new id.
pub const CREATE_PROJECT: Endpoint<Uuid> =
    Endpoint::new(HttpMethod::Post, "/api/project", &[(200, Decode::Single)]);
