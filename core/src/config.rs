//! Client configuration.
//!
//! # Design
//! `ClientConfig` is everything a transport needs to know that does not
//! change between calls: where the backend lives, how long to wait, which
//! headers and credentials to attach, and whether undocumented status codes
//! are errors. It is built once, validated on the way in, and then only read.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_AUTH_PREFIX: &str = "Bearer";
const DEFAULT_AUTH_HEADER: &str = "Authorization";

pub const ENV_BASE_URL: &str = "SENTINEL_BASE_URL";
pub const ENV_TOKEN: &str = "SENTINEL_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "SENTINEL_TIMEOUT_SECS";
pub const ENV_STRICT: &str = "SENTINEL_STRICT";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Auth {
    token: String,
    prefix: String,
    header_name: String,
}

/// Immutable connection settings shared by every call through a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    auth: Option<Auth>,
    follow_redirects: bool,
    raise_on_unexpected_status: bool,
}

impl ClientConfig {
    pub fn builder(base_url: Url) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Default settings for `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::builder(Url::parse(base_url)?).build())
    }

    /// Read settings from the process environment.
    ///
    /// `SENTINEL_BASE_URL` is required; `SENTINEL_TOKEN`,
    /// `SENTINEL_TIMEOUT_SECS` and `SENTINEL_STRICT` are optional.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .ok_or_else(|| ApiError::InvalidConfig(format!("{ENV_BASE_URL} is not set")))?;
        let mut builder = Self::builder(Url::parse(&base_url)?);

        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            builder = builder.token(token);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::InvalidConfig(format!(
                    "{ENV_TIMEOUT_SECS} must be whole seconds, got `{raw}`"
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_STRICT) {
            let strict = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ApiError::InvalidConfig(format!(
                        "{ENV_STRICT} must be a boolean, got `{raw}`"
                    )))
                }
            };
            builder = builder.raise_on_unexpected_status(strict);
        }
        Ok(builder.build())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn raise_on_unexpected_status(&self) -> bool {
        self.raise_on_unexpected_status
    }

    /// Headers attached to every request: configured headers, then the
    /// `Cookie` header, then the auth header.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.push(("cookie".to_string(), cookie));
        }
        if let Some(auth) = &self.auth {
            let value = if auth.prefix.is_empty() {
                auth.token.clone()
            } else {
                format!("{} {}", auth.prefix, auth.token)
            };
            headers.push((auth.header_name.clone(), value));
        }
        headers
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            config: ClientConfig {
                base_url,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                headers: Vec::new(),
                cookies: Vec::new(),
                auth: None,
                follow_redirects: false,
                raise_on_unexpected_status: false,
            },
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a header sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidHeader` if the name or value is not valid HTTP.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ApiError> {
        let (name, value) = (name.as_ref(), value.as_ref());
        reqwest::header::HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
        reqwest::header::HeaderValue::from_str(value)
            .map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
        self.config.headers.push((name.to_string(), value.to_string()));
        Ok(self)
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.cookies.push((name.into(), value.into()));
        self
    }

    /// Authenticate with `token`, sent as `Authorization: Bearer <token>`
    /// unless the prefix or header name is changed.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        match &mut self.config.auth {
            Some(auth) => auth.token = token,
            None => {
                self.config.auth = Some(Auth {
                    token,
                    prefix: DEFAULT_AUTH_PREFIX.to_string(),
                    header_name: DEFAULT_AUTH_HEADER.to_string(),
                })
            }
        }
        self
    }

    /// Prefix placed before the token. An empty prefix sends the bare token.
    /// Has no effect until `token` is set.
    pub fn auth_prefix(mut self, prefix: impl Into<String>) -> Self {
        if let Some(auth) = &mut self.config.auth {
            auth.prefix = prefix.into();
        }
        self
    }

    /// Header carrying the token. Has no effect until `token` is set.
    pub fn auth_header_name(mut self, name: impl Into<String>) -> Self {
        if let Some(auth) = &mut self.config.auth {
            auth.header_name = name.into();
        }
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Strict mode: undocumented status codes become `ApiError::UnexpectedStatus`
    /// instead of an absent value.
    pub fn raise_on_unexpected_status(mut self, strict: bool) -> Self {
        self.config.raise_on_unexpected_status = strict;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
