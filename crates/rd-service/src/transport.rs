//! HTTP transport seam.
//!
//! [`ValhallaClient`][crate::ValhallaClient] speaks JSON over a [`Transport`]
//! so endpoint fallback and response decoding can be exercised without a
//! network.  [`ReqwestTransport`] is the production implementation.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::{ServiceError, ServiceResult};

/// Status line and body of one HTTP exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body:   String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Blocking JSON POST.
pub trait Transport: Send + Sync {
    /// POST `body` to `url`, waiting at most `timeout` for the full reply.
    ///
    /// Non-success statuses are returned as replies, not errors; only
    /// connection-level failures are `Err`.
    fn post_json(&self, url: &str, body: &serde_json::Value, timeout: Duration) -> ServiceResult<HttpReply>;
}

/// Blocking `reqwest` client with connection pooling.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> ServiceResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("route-delta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ServiceError::Transport { url: String::new(), source })?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value, timeout: Duration) -> ServiceResult<HttpReply> {
        let classify = |source: reqwest::Error| {
            if source.is_timeout() {
                ServiceError::Timeout { url: url.to_owned(), after: timeout }
            } else {
                ServiceError::Transport { url: url.to_owned(), source }
            }
        };

        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(HttpReply { status, body })
    }
}
