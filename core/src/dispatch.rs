//! Generic endpoint dispatch.
//!
//! # Design
//! Every operation goes through the same three steps:
//!
//! 1. `build_request` renders the descriptor and params into an
//!    `HttpRequest` (path substitution, query string, headers, body). Missing
//!    parameters fail here, before any I/O.
//! 2. The client's transport performs the exchange, blocking or async.
//! 3. `parse_response` looks the status up in the descriptor's table and
//!    decodes accordingly, always returning the raw exchange alongside.
//!
//! Steps 1 and 3 are pure and shared by both call shapes, so blocking and
//! async dispatch decode identically by construction.

use serde::de::DeserializeOwned;
use url::Url;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::endpoint::{Decode, Endpoint, Params};
use crate::envelope::{Decoded, Envelope};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{AsyncTransport, Transport};

/// Render `endpoint` with `params` into a request against `config`'s base URL.
pub fn build_request<T>(
    endpoint: &Endpoint<T>,
    params: &Params,
    config: &ClientConfig,
) -> Result<HttpRequest, ApiError> {
    let path = endpoint.render_path(params)?;
    let base = config.base_url().as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}{path}"))?;
    if !params.query_pairs().is_empty() {
        url.query_pairs_mut().extend_pairs(params.query_pairs());
    }

    let mut headers = config.request_headers();
    let body = params.body().map(str::to_string);
    if body.is_some() {
        headers.push(("content-type".to_string(), "application/json".to_string()));
    }

    Ok(HttpRequest {
        method: endpoint.method(),
        url: url.into(),
        headers,
        body,
    })
}

/// Decode `response` according to `endpoint`'s status table.
///
/// Undocumented statuses fail with `UnexpectedStatus` when `config` is strict
/// and yield `parsed: None` otherwise.
pub fn parse_response<T>(
    endpoint: &Endpoint<T>,
    response: HttpResponse,
    config: &ClientConfig,
) -> Result<Envelope<T>, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status;
    let parsed = match endpoint.decode_for(status) {
        Decode::List => Some(Decoded::List(decode_body(&response)?)),
        Decode::Single => Some(Decoded::Single(decode_body(&response)?)),
        Decode::Empty => Some(Decoded::Empty),
        Decode::Unexpected if config.raise_on_unexpected_status() => {
            return Err(ApiError::UnexpectedStatus {
                status,
                body: response.body,
            });
        }
        Decode::Unexpected => None,
    };

    Ok(Envelope {
        status,
        headers: response.headers,
        body: response.body,
        parsed,
    })
}

fn decode_body<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, ApiError> {
    serde_json::from_slice(&response.body).map_err(|source| ApiError::MalformedResponse {
        status: response.status,
        source,
    })
}

/// Perform `endpoint` on the calling thread and return the full envelope.
pub fn dispatch<T, X>(
    endpoint: &Endpoint<T>,
    params: &Params,
    client: &Client<X>,
) -> Result<Envelope<T>, ApiError>
where
    T: DeserializeOwned,
    X: Transport,
{
    let request = build_request(endpoint, params, client.config())?;
    let response = client.transport().send(&request)?;
    parse_response(endpoint, response, client.config())
}

/// Perform `endpoint`, suspending at the I/O boundary, and return the full
/// envelope.
pub async fn dispatch_async<T, X>(
    endpoint: &Endpoint<T>,
    params: &Params,
    client: &Client<X>,
) -> Result<Envelope<T>, ApiError>
where
    T: DeserializeOwned,
    X: AsyncTransport,
{
    let request = build_request(endpoint, params, client.config())?;
    let response = client.transport().send_async(&request).await?;
    parse_response(endpoint, response, client.config())
}

/// Like `dispatch`, keeping only the decoded value.
pub fn call<T, X>(
    endpoint: &Endpoint<T>,
    params: &Params,
    client: &Client<X>,
) -> Result<Option<Decoded<T>>, ApiError>
where
    T: DeserializeOwned,
    X: Transport,
{
    Ok(dispatch(endpoint, params, client)?.into_parsed())
}

/// Like `dispatch_async`, keeping only the decoded value.
pub async fn call_async<T, X>(
    endpoint: &Endpoint<T>,
    params: &Params,
    client: &Client<X>,
) -> Result<Option<Decoded<T>>, ApiError>
where
    T: DeserializeOwned,
    X: AsyncTransport,
{
    Ok(dispatch_async(endpoint, params, client).await?.into_parsed())
}
