//! HTTP transport
//!
//! The network seam of the request client. [`HttpTransport`] talks to the real
//! API with `reqwest`; tests substitute their own [`Transport`] to count and
//! script calls.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::envelope::RawResponse;
use super::error::{ApiError, ApiResult};

/// Issues one network call per invocation and returns the raw response.
///
/// Implementations must not retry and must not interpret the body; envelope
/// decoding happens in the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with no body
    async fn get(&self, url: &str) -> ApiResult<RawResponse>;

    /// POST `body` as JSON to `url`
    async fn post(&self, url: &str, body: &Value) -> ApiResult<RawResponse>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("cyclefit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> ApiResult<RawResponse> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_request_error)?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> ApiResult<RawResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_request_error)?;

        Self::read(response).await
    }

    async fn post(&self, url: &str, body: &Value) -> ApiResult<RawResponse> {
        // `.json()` sets `Content-Type: application/json`
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        Self::read(response).await
    }
}

fn map_request_error(e: reqwest::Error) -> ApiError {
    if e.is_connect() {
        ApiError::Transport(format!("connection failed: {}", e))
    } else {
        ApiError::from(e)
    }
}
