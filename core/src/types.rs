//! Domain DTOs for the Sentinel API.
//!
//! # Design
//! The client treats these as payloads: it decodes them and hands them to
//! the caller without interpreting them. Fields the backend may add later
//! are kept in `extra` where the shape is loose (`ToolRequest`) and ignored
//! elsewhere. The mock server defines its own copies; integration tests
//! catch drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool invocation awaiting (or having received) review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolRequest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A tool call recorded against a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub tool_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

/// Supervision state of a tool call: the call, the state of each
/// supervisor chain that reviewed it, and the overall status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunExecution {
    pub toolcall: ToolCall,
    #[serde(default)]
    pub chains: Vec<Value>,
    pub status: String,
}

/// A chat message logged for a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Request payload for registering a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateProject {
    pub name: String,
}
