//! Request client
//!
//! `get`/`post` primitives over a fixed API base with GET coalescing and a
//! single error channel.

use futures_util::future::FutureExt;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::envelope::{Envelope, RawResponse};
use super::error::{ApiError, ApiResult};
use super::inflight::{InflightRegistry, Join};
use super::transport::{HttpTransport, Transport};

/// Request client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// API base, prefixed to every path (e.g. "http://localhost:8000/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call deadline in milliseconds, 0 disables it
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Default deadline, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

/// Per-call options
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// Overrides the client's default deadline for this call
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Client for the remote JSON API.
///
/// Created once at startup and handed to whoever needs it. Clones share the
/// same in-flight registry, so coalescing spans every clone. Entries expire on
/// settlement; there is no explicit teardown.
#[derive(Clone)]
pub struct RequestClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    inflight: InflightRegistry,
    config: ClientConfig,
}

impl RequestClient {
    /// Create a client backed by [`HttpTransport`]
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            inflight: InflightRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for `path`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET `path`, sharing the outcome with concurrent callers of the same path
    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.get_with(path, RequestOptions::default()).await
    }

    /// GET with per-call options.
    ///
    /// The options of the caller that starts the call apply; callers that
    /// join an in-flight call share its deadline and outcome.
    pub async fn get_with(&self, path: &str, options: RequestOptions) -> ApiResult<Value> {
        let url = self.url(path);
        let timeout = options.timeout.or_else(|| self.config.request_timeout());
        let transport = Arc::clone(&self.transport);

        let (call, join) = self
            .inflight
            .join_or_start(path, move || {
                async move {
                    let request_id = Uuid::new_v4();
                    tracing::debug!(request_id = %request_id, url = %url, "GET");

                    let response = with_deadline(timeout, transport.get(&url)).await;
                    settle(request_id, response)
                }
                .boxed()
            })
            .await;

        if join == Join::Joined {
            tracing::debug!(path = %path, "Joined in-flight GET");
        }

        call.await
    }

    /// POST `body` to `path`. Never coalesced.
    pub async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.post_with(path, body, RequestOptions::default()).await
    }

    /// POST with per-call options
    pub async fn post_with(
        &self,
        path: &str,
        body: Value,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let url = self.url(path);
        let timeout = options.timeout.or_else(|| self.config.request_timeout());
        let body = if body.is_null() {
            Value::Object(Default::default())
        } else {
            body
        };

        let request_id = Uuid::new_v4();
        tracing::debug!(request_id = %request_id, url = %url, "POST");

        let response = with_deadline(timeout, self.transport.post(&url, &body)).await;
        settle(request_id, response)
    }

    /// Number of GET paths currently in flight
    pub async fn in_flight_count(&self) -> usize {
        self.inflight.len().await
    }
}

async fn with_deadline<F>(timeout: Option<Duration>, call: F) -> ApiResult<RawResponse>
where
    F: Future<Output = ApiResult<RawResponse>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| ApiError::Timeout(limit))?,
        None => call.await,
    }
}

fn settle(request_id: Uuid, response: ApiResult<RawResponse>) -> ApiResult<Value> {
    let result = response.and_then(|raw| {
        tracing::debug!(request_id = %request_id, status = raw.status, "Response received");
        Envelope::decode(&raw).into_result()
    });

    if let Err(e) = &result {
        tracing::debug!(request_id = %request_id, error = %e, "Request failed");
    }

    result
}
