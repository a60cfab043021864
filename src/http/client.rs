//! JSON-over-HTTP transport for the store adapters
//!
//! Every call is exactly one request. A non-success status comes back as
//! `Error::HttpStatus` with the response body, an elapsed client timeout as
//! `Error::Timeout` and an unparsable body as `Error::Decode`.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("quiet-thoughts/", env!("CARGO_PKG_VERSION"));

/// Transport settings shared by every request of a client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Optional client-side rate limit
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Throttle requests
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Query parameters and JSON body of one request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestConfig {
    /// Empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client with a fixed timeout and optional rate limiting
pub struct HttpClient {
    client: Client,
    timeout: Duration,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client from config
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
        })
    }

    /// Send one request, failing on any non-success status
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.request(method.clone(), url);
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} {} -> {}", method, url, status);
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("{} {} -> {}", method, url, status);
        Ok(response)
    }

    /// GET and parse the JSON response
    pub async fn get_json_with_config<T: DeserializeOwned>(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.send_json(Method::GET, url, config).await
    }

    /// POST and parse the JSON response
    pub async fn post_json_with_config<T: DeserializeOwned>(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.send_json(Method::POST, url, config).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.request(method, url, config)
            .await?
            .json()
            .await
            .map_err(|e| Error::decode(format!("Invalid JSON response: {e}")))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.timeout)
            .field("rate_limited", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
