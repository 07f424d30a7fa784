//! Dispatcher behavior against scripted transports.
//!
//! # Design
//! `Scripted` answers every request with a fixed reply and records what it
//! was asked to send, so each test can assert both the decoded outcome and
//! the exact request (or the absence of one).

use std::sync::Mutex;

use sentinel_core::{
    api, call, call_async, dispatch, dispatch_async, ApiError, AsyncTransport, Client, ClientConfig,
    Decoded, HttpMethod, HttpRequest, HttpResponse, Params, ToolRequest, Transport, TransportError,
};

const REVIEW_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
const BASE_URL: &str = "http://localhost:8080";

enum Reply {
    Respond(HttpResponse),
    TimeOut,
}

struct Scripted {
    reply: Reply,
    sent: Mutex<Vec<HttpRequest>>,
}

impl Scripted {
    fn new(status: u16, body: &str) -> Self {
        Self {
            reply: Reply::Respond(HttpResponse {
                status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: body.as_bytes().to_vec(),
            }),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn timing_out() -> Self {
        Self {
            reply: Reply::TimeOut,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn answer(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::TimeOut => Err(TransportError::Timeout(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "deadline elapsed",
            )))),
        }
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for Scripted {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.answer(request)
    }
}

impl AsyncTransport for Scripted {
    async fn send_async(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.answer(request)
    }
}

fn client(transport: Scripted, strict: bool) -> Client<Scripted> {
    let config = ClientConfig::builder(BASE_URL.parse().unwrap())
        .raise_on_unexpected_status(strict)
        .build();
    Client::with_transport(config, transport)
}

fn review_params() -> Params {
    Params::new().path("review_id", REVIEW_ID)
}

// ---------------------------------------------------------------------------
// Tool requests for a review
// ---------------------------------------------------------------------------

#[test]
fn tool_requests_200_decodes_ordered_list() {
    let client = client(Scripted::new(200, r#"[{"id": "1", "tool": "search"}]"#), false);

    let envelope = dispatch(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap();

    assert_eq!(envelope.status, 200);
    assert_eq!(envelope.body, br#"[{"id": "1", "tool": "search"}]"#);
    assert_eq!(envelope.headers[0].0, "content-type");
    let requests = envelope.parsed.unwrap().into_list().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, "1");
    assert_eq!(requests[0].tool.as_deref(), Some("search"));

    let sent = client.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].url, format!("{BASE_URL}/api/reviews/{REVIEW_ID}/toolrequests"));
    assert!(sent[0].body.is_none());
}

#[test]
fn tool_requests_404_is_the_empty_marker() {
    let client = client(Scripted::new(404, ""), false);

    let parsed = call(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap();

    assert_eq!(parsed, Some(Decoded::Empty));
}

#[test]
fn tool_requests_404_is_not_an_error_in_strict_mode() {
    let client = client(Scripted::new(404, ""), true);

    let parsed = call(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap();

    assert_eq!(parsed, Some(Decoded::Empty));
}

#[test]
fn tool_requests_500_strict_is_unexpected_status() {
    let client = client(Scripted::new(500, "internal error"), true);

    let err = dispatch(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap_err();

    match err {
        ApiError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, b"internal error");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[test]
fn tool_requests_500_lenient_is_absent() {
    let client = client(Scripted::new(500, "internal error"), false);

    let envelope = dispatch(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap();

    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.body, b"internal error");
    assert!(envelope.parsed.is_none());
}

#[test]
fn missing_path_param_fails_before_sending() {
    let client = client(Scripted::new(200, "[]"), false);

    let err = dispatch(&api::GET_REVIEW_TOOL_REQUESTS, &Params::new(), &client).unwrap_err();

    assert!(matches!(err, ApiError::MissingPathParam(ref name) if name == "review_id"));
    assert!(client.transport().sent().is_empty());
}

#[test]
fn malformed_list_body_is_reported() {
    let client = client(Scripted::new(200, r#"[{"tool": "search"}]"#), false);

    let err = call(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap_err();

    assert!(matches!(err, ApiError::MalformedResponse { status: 200, .. }));
}

#[test]
fn transport_timeout_propagates() {
    let client = client(Scripted::timing_out(), true);

    let err = dispatch(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap_err();

    assert!(matches!(err, ApiError::Transport(ref t) if t.is_timeout()));
    assert_eq!(client.transport().sent().len(), 1, "exactly one attempt");
}

// ---------------------------------------------------------------------------
// Blocking and async shapes agree
// ---------------------------------------------------------------------------

#[tokio::test]
async fn async_shape_matches_blocking_shape() {
    let body = r#"[{"id":"1","tool":"search"},{"id":"2","tool":"browse","arguments":{"url":"x"}}]"#;
    let blocking = client(Scripted::new(200, body), false);
    let suspending = client(Scripted::new(200, body), false);

    let a = dispatch(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &blocking).unwrap();
    let b = dispatch_async(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &suspending)
        .await
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(blocking.transport().sent(), suspending.transport().sent());
}

#[tokio::test]
async fn async_shape_applies_the_same_policy() {
    let strict = client(Scripted::new(503, "down"), true);
    let err = call_async(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &strict)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedStatus { status: 503, .. }));

    let lenient = client(Scripted::new(404, ""), false);
    let parsed = call_async(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &lenient)
        .await
        .unwrap();
    assert_eq!(parsed, Some(Decoded::<ToolRequest>::Empty));
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

#[test]
fn auth_and_default_headers_are_sent() {
    let config = ClientConfig::builder(BASE_URL.parse().unwrap())
        .header("x-client", "tests")
        .unwrap()
        .token("secret")
        .build();
    let client = Client::with_transport(config, Scripted::new(200, "[]"));

    call(&api::GET_RUN_MESSAGES, &Params::new().path("run_id", REVIEW_ID), &client).unwrap();

    let sent = client.transport().sent();
    assert_eq!(
        sent[0].headers,
        vec![
            ("x-client".to_string(), "tests".to_string()),
            ("Authorization".to_string(), "Bearer secret".to_string()),
        ]
    );
}

#[test]
fn create_project_sends_json_body() {
    let id = "7f1b9c2e-0000-4000-8000-000000000001";
    let client = client(Scripted::new(200, &format!("\"{id}\"")), false);
    let params = Params::new()
        .json(&sentinel_core::CreateProject {
            name: "gaia".to_string(),
        })
        .unwrap();

    let parsed = call(&api::CREATE_PROJECT, &params, &client).unwrap();

    assert_eq!(parsed.unwrap().into_single().unwrap().to_string(), id);
    let sent = client.transport().sent();
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].url, format!("{BASE_URL}/api/project"));
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"name":"gaia"}"#));
    assert!(sent[0]
        .headers
        .contains(&("content-type".to_string(), "application/json".to_string())));
}

#[test]
fn concurrent_calls_share_one_client() {
    let client = client(Scripted::new(200, r#"[{"id": "1", "tool": "search"}]"#), false);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let parsed =
                    call(&api::GET_REVIEW_TOOL_REQUESTS, &review_params(), &client).unwrap();
                assert_eq!(parsed.unwrap().into_list().unwrap()[0].id, "1");
            });
        }
    });

    assert_eq!(client.transport().sent().len(), 8);
}
