//! In-flight GET registry
//!
//! Coalesces concurrent GETs for the same path into one network call.
//!
//! ## Lifecycle of an entry
//!
//! `IDLE → IN_FLIGHT → {SUCCEEDED | FAILED | TIMED_OUT} → REMOVED`
//!
//! - Check-and-register happens under a single lock, so at most one entry
//!   exists per key.
//! - The call runs in its own task. It keeps going when every waiter has been
//!   dropped, and it removes its own entry before any waiter can observe the
//!   outcome.
//! - Keys are plain path strings: two logically different GETs that share a
//!   path are coalesced.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::{ApiError, ApiResult};

/// Outcome of a coalesced call, cloneable for every waiter
pub type SharedCall = Shared<BoxFuture<'static, ApiResult<Value>>>;

/// Whether a caller started the call or joined an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    Started,
    Joined,
}

/// Registry of outstanding GET calls keyed by path
#[derive(Clone, Default)]
pub struct InflightRegistry {
    calls: Arc<Mutex<HashMap<String, SharedCall>>>,
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pending call for `key`, or spawn `call` and register it.
    ///
    /// `call` is only invoked when nothing is in flight for `key`.
    pub async fn join_or_start<F>(&self, key: &str, call: F) -> (SharedCall, Join)
    where
        F: FnOnce() -> BoxFuture<'static, ApiResult<Value>>,
    {
        let mut calls = self.calls.lock().await;
        if let Some(pending) = calls.get(key) {
            return (pending.clone(), Join::Joined);
        }

        let task = {
            let registry = self.clone();
            let key = key.to_string();
            let call = call();
            tokio::spawn(async move {
                let result = call.await;
                registry.remove(&key).await;
                result
            })
        };

        // The task removes the entry itself unless it was aborted before
        // settling, e.g. during runtime shutdown.
        let registry = self.clone();
        let owned_key = key.to_string();
        let shared = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    registry.remove(&owned_key).await;
                    Err(ApiError::Transport(format!("request task failed: {}", e)))
                }
            }
        }
        .boxed()
        .shared();

        calls.insert(key.to_string(), shared.clone());
        (shared, Join::Started)
    }

    /// Number of keys currently in flight
    pub async fn len(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.calls.lock().await.is_empty()
    }

    /// Whether `key` has an outstanding call
    pub async fn contains(&self, key: &str) -> bool {
        self.calls.lock().await.contains_key(key)
    }

    async fn remove(&self, key: &str) {
        self.calls.lock().await.remove(key);
    }
}
