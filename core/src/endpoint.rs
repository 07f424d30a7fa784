//! Endpoint descriptors and call parameters.
//!
//! # Design
//! An `Endpoint<T>` is data, not code: a method, a path template with
//! `{name}` placeholders, and a table mapping status codes to a `Decode`
//! rule. Descriptors are `const`-constructible so the whole API surface is a
//! list of constants (see `crate::api`). `T` is the item type a `List` or
//! `Single` rule decodes into.
//!
//! `Params` carries the per-call values: path parameters, query pairs and an
//! optional JSON body.

use std::fmt;
use std::marker::PhantomData;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Characters escaped when a value is substituted into a path segment.
///
/// `/` and `%` are included so a substituted value can never introduce a new
/// segment or collide with an already-escaped one.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// How the body of a response with a given status is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// JSON array, each element decoded into `T`, order preserved.
    List,
    /// A single JSON value decoded into `T`.
    Single,
    /// Body ignored; the call yields the explicit empty marker.
    Empty,
    /// Undocumented status, handled by the client's unexpected-status policy.
    Unexpected,
}

/// Immutable description of one API operation.
pub struct Endpoint<T> {
    method: HttpMethod,
    path: &'static str,
    responses: &'static [(u16, Decode)],
    _item: PhantomData<fn() -> T>,
}

impl<T> Endpoint<T> {
    pub const fn new(
        method: HttpMethod,
        path: &'static str,
        responses: &'static [(u16, Decode)],
    ) -> Self {
        Self {
            method,
            path,
            responses,
            _item: PhantomData,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn responses(&self) -> &'static [(u16, Decode)] {
        self.responses
    }

    /// Decoding rule for `status`. The first table entry wins; unmapped
    /// statuses are `Decode::Unexpected`.
    pub fn decode_for(&self, status: u16) -> Decode {
        self.responses
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, rule)| *rule)
            .unwrap_or(Decode::Unexpected)
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> Result<Vec<&'static str>, ApiError> {
        let mut names = Vec::new();
        for segment in parse_template(self.path)? {
            if let Segment::Param(name) = segment {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Substitute every placeholder with its percent-encoded value.
    ///
    /// Fails with `MissingPathParam` for the first placeholder that has no
    /// value in `params`.
    pub fn render_path(&self, params: &Params) -> Result<String, ApiError> {
        let mut rendered = String::with_capacity(self.path.len());
        for segment in parse_template(self.path)? {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Param(name) => {
                    let value = params
                        .path_value(name)
                        .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))?;
                    rendered.extend(utf8_percent_encode(value, PATH_SEGMENT));
                }
            }
        }
        Ok(rendered)
    }
}

// Manual impls: the derives would needlessly require `T: Clone` / `T: Debug`.
impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Endpoint<T> {}

impl<T> fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("responses", &self.responses)
            .finish()
    }
}

enum Segment {
    Literal(&'static str),
    Param(&'static str),
}

fn parse_template(template: &'static str) -> Result<Vec<Segment>, ApiError> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ApiError::InvalidPathTemplate(template.to_string()))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(ApiError::InvalidPathTemplate(template.to_string()));
        }
        segments.push(Segment::Param(name));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    Ok(segments)
}

/// Per-call values for an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    path: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a path parameter. Setting the same name twice keeps the last value.
    pub fn path(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.path.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.path.push((name, value)),
        }
        self
    }

    /// Append a query pair. Repeated names are sent repeatedly, in order.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(ApiError::Serialization)?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn path_value(&self, name: &str) -> Option<&str> {
        self.path.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
