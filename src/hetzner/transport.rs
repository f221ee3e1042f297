use std::{fmt::Debug, time::Duration};

use http::{Method, StatusCode};
use log::trace;
use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderValue},
};
use thiserror::Error;

use super::HetznerError;

#[cfg(test)]
use mockall::automock;

const AUTH_HEADER: &str = "Auth-API-Token";

/// A single request against the Hetzner DNS API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with a `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and raw body of an API response. Body parsing is left to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }
}

/// The API could not be reached at all. Never produced for HTTP error statuses
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to Hetzner API failed: {0}")]
    Http(#[source] reqwest::Error),
    /// Raised by transports that are not backed by reqwest
    #[error("could not connect to Hetzner API: {0}")]
    Connect(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(e) if e.is_timeout())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // Strip the url, it is the same for every request and only adds noise
        TransportError::Http(e.without_url())
    }
}

/// A transport sends a single [`ApiRequest`] and returns the raw response.
///
/// Authentication is the responsibility of the transport, requests themselves never carry the token.
#[cfg_attr(test, automock)]
pub trait Transport {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Blocking [`Transport`] backed by [`reqwest`]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Build a transport that authenticates every request with `api_token`.
    ///
    /// Fails with [`HetznerError::Config`] if the token cannot be sent as a header or the HTTP client cannot be built.
    pub fn try_new(
        api_token: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<ReqwestTransport, HetznerError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(api_token).map_err(|_| {
            HetznerError::Config(
                "API token contains characters that are not allowed in an HTTP header".into(),
            )
        })?;
        token.set_sensitive(true);
        headers.insert(AUTH_HEADER, token);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| HetznerError::Config(format!("could not build HTTP client: {}", e)))?;

        Ok(ReqwestTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        trace!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method, url)
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status();
        let body = response.text()?;
        trace!("Response [{}] {}", status, body);
        Ok(ApiResponse { status, body })
    }
}
