//! The HTTP seam.
//!
//! [`Transport`] sends one fully-described request and hands back the raw
//! status, headers and body. It knows nothing about FMC semantics; the client
//! classifies every [`RawResponse`] itself. Only failures below HTTP (DNS,
//! TLS, timeouts) are errors at this level.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Certificate, Client, ClientBuilder, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("fmc-rs/", env!("CARGO_PKG_VERSION"));

/// One outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, without query.
    pub url: Url,
    /// Query parameters, in order.
    pub query: Vec<(&'static str, String)>,
    /// Extra headers, e.g. the access token.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Option<Value>,
    /// Basic-auth credentials; only used by the token exchange.
    pub basic_auth: Option<(String, String)>,
}

impl RawRequest {
    /// A request with no query, headers or body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            basic_auth: None,
        }
    }

    /// Path component of the URL, for logs and error context.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// The answer to a [`RawRequest`], unclassified.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// A response with a JSON body.
    #[must_use]
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    /// A response without a body.
    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

/// Sends requests to the controller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return whatever the server answered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::Timeout`] when no HTTP
    /// response was received.
    async fn send(&self, request: RawRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be read or
    /// the client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(10))
            .danger_accept_invalid_certs(!config.tls_verify);

        if !config.enable_compression {
            builder = builder.no_gzip();
        }

        if let Some(path) = &config.ca_cert {
            let pem = std::fs::read(path).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate `{}`: {err}",
                    path.display()
                ))
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|err| {
                Error::ConfigError(format!("Invalid CA certificate `{}`: {err}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build FMC HTTP client: {err}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RawRequest) -> Result<RawResponse> {
        let RawRequest {
            method,
            url,
            query,
            headers,
            body,
            basic_auth,
        } = request;

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some((user, pass)) = basic_auth {
            builder = builder.basic_auth(user, Some(pass));
        }
        if let Some(payload) = body {
            builder = builder.json(&payload);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| Error::Transport(format!("Failed to read FMC response body: {err}")))?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
