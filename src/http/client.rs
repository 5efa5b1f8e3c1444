//! HTTP client
//!
//! Provides the [`HttpFetch`] capability and its reqwest-backed implementation.
//! Non-success statuses are returned as data, not errors: deciding what a
//! 404 or 500 means is left to the caller.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }

    /// Convert a non-success response into an [`Error::HttpStatus`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, self.text()))
        }
    }
}

/// The single network capability the pager depends on
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Issue a GET request with the given headers
    async fn get(&self, url: &str, headers: &StringMap) -> Result<HttpResponse>;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            default_headers: StringMap::new(),
            user_agent: format!("pagefan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&HttpConfig> for HttpClientConfig {
    fn from(http: &HttpConfig) -> Self {
        let mut config = Self {
            timeout: http.timeout(),
            connect_timeout: http.connect_timeout(),
            ..Self::default()
        };
        if let Some(agent) = &http.user_agent {
            config.user_agent.clone_from(agent);
        }
        config
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// reqwest-backed [`HttpFetch`]
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn get(&self, url: &str, headers: &StringMap) -> Result<HttpResponse> {
        let mut req = self.client.get(url);

        // Request headers win over defaults
        let mut merged = self.config.default_headers.clone();
        merged.extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        for (key, value) in &merged {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
