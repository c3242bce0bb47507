use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method};
use thiserror::Error;

use crate::error::{Context, FetchError, Result};

/// Status and body of a completed HTTP exchange. Status classification is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),
    #[error("{0}")]
    Request(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(limit) => FetchError::Timeout(limit),
            TransportError::Request(detail) => FetchError::Transport(detail),
        }
    }
}

/// One outbound request. Implementations must be shareable across burst workers.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<RawResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .with_context(|| format!("Invalid user agent header: {}", user_agent))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<RawResponse, TransportError> {
        let response = self
            .client
            .request(method, url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(err, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| classify(err, timeout))?;

        Ok(RawResponse { status, body })
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Request(err.to_string())
    }
}
