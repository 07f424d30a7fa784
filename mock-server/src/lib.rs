use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolRequest {
    pub id: String,
    pub tool: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub tool_id: String,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunExecution {
    pub toolcall: ToolCall,
    pub chains: Vec<serde_json::Value>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Option<String>,
    pub role: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
}

/// Seed data the server starts with.
#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    pub reviews: HashMap<Uuid, Vec<ToolRequest>>,
    pub tool_calls: HashMap<Uuid, ToolCall>,
    pub call_status: HashMap<Uuid, String>,
    pub run_messages: HashMap<Uuid, Vec<Message>>,
    pub projects: HashMap<Uuid, String>,
}

pub type Db = Arc<RwLock<Fixtures>>;

pub fn app() -> Router {
    app_with(Fixtures::default())
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(RwLock::new(fixtures));
    Router::new()
        .route("/api/reviews/{review_id}/toolrequests", get(get_review_tool_requests))
        .route("/api/tool_call/{tool_call_id}", get(get_tool_call))
        .route("/api/tool_call/{tool_call_id}/state", get(get_tool_call_state))
        .route("/api/run/{run_id}/messages", get(get_run_messages))
        .route("/api/project", post(create_project))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Fixtures::default()).await
}

pub async fn run_with(listener: TcpListener, fixtures: Fixtures) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(fixtures)).await
}

async fn get_review_tool_requests(
    State(db): State<Db>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<Vec<ToolRequest>>, StatusCode> {
    debug!(%review_id, "get review tool requests");
    let data = db.read().await;
    data.reviews.get(&review_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_tool_call(
    State(db): State<Db>,
    Path(tool_call_id): Path<Uuid>,
) -> Result<Json<ToolCall>, StatusCode> {
    debug!(%tool_call_id, "get tool call");
    let data = db.read().await;
    data.tool_calls.get(&tool_call_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_tool_call_state(
    State(db): State<Db>,
    Path(tool_call_id): Path<Uuid>,
) -> Result<Json<RunExecution>, StatusCode> {
    debug!(%tool_call_id, "get tool call state");
    let data = db.read().await;
    let toolcall = data.tool_calls.get(&tool_call_id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    let status = data
        .call_status
        .get(&tool_call_id)
        .cloned()
        .unwrap_or_else(|| "pending".to_string());
    Ok(Json(RunExecution {
        toolcall,
        chains: Vec::new(),
        status,
    }))
}

async fn get_run_messages(State(db): State<Db>, Path(run_id): Path<Uuid>) -> Json<Vec<Message>> {
    debug!(%run_id, "get run messages");
    let data = db.read().await;
    Json(data.run_messages.get(&run_id).cloned().unwrap_or_default())
}

async fn create_project(
    State(db): State<Db>,
    Json(input): Json<CreateProject>,
) -> Result<Json<Uuid>, StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut data = db.write().await;
    let existing = data
        .projects
        .iter()
        .find(|(_, name)| **name == input.name)
        .map(|(id, _)| *id);
    let id = existing.unwrap_or_else(|| {
        let id = Uuid::new_v4();
        data.projects.insert(id, input.name.clone());
        id
    });
    debug!(%id, name = %input.name, "create project");
    Ok(Json(id))
}
