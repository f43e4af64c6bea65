//! Request Client
//!
//! Mediates between callers and the remote JSON API.
//!
//! ## Architecture
//!
//! - **Transport**: one network call per invocation (`reqwest` by default)
//! - **Envelope**: classifies a raw response as payload or failure
//! - **InflightRegistry**: coalesces concurrent GETs for the same path
//! - **RequestClient**: `get`/`post` over a fixed base URL
//! - **auth**: merges a stored credential into a POST body
//!
//! ## Semantics
//!
//! 1. Concurrent `get(p)` calls share one network call and one outcome
//! 2. A settled `get(p)` frees `p`; the next call goes to the network again
//! 3. `post` is never coalesced
//! 4. Nothing is retried

mod auth;
mod envelope;
mod error;
mod inflight;
mod request;
mod transport;

pub use auth::{auth, Credential};
pub use envelope::{Envelope, FailureKind, RawResponse, GENERIC_SERVER_MESSAGE};
pub use error::{ApiError, ApiResult};
pub use inflight::{InflightRegistry, Join, SharedCall};
pub use request::{ClientConfig, RequestClient, RequestOptions};
pub use transport::{HttpTransport, Transport};
