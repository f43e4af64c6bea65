//! # Cyclefit
//!
//! Client core for a social workout-cycle tracker: users build multi-day
//! training cycles, publish them, follow each other and tick off daily
//! duties against a remote JSON API.
//!
//! ## Modules
//!
//! - [`client`]: Request client with GET coalescing and uniform error envelopes
//! - [`schedule`]: Pure calendar projection of periodic training plans
//! - [`api`]: Typed operations of the remote API
//! - [`session`]: Durable slot for the signed-in user's credential
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cyclefit::api::CycleApi;
//! use cyclefit::client::{ClientConfig, Credential, RequestClient};
//! use cyclefit::schedule::{project_from_str, DEFAULT_HORIZON_DAYS};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RequestClient::new(ClientConfig::default())?;
//!     let user = Credential::new("anna", "secret");
//!     let api = CycleApi::new(&client, Some(&user));
//!
//!     // Concurrent identical GETs share one network call
//!     let (profile, again) = tokio::join!(api.profile("anna"), api.profile("anna"));
//!     assert_eq!(profile?, again?);
//!
//!     // Preview three training days followed by two rest days
//!     let preview = project_from_str(Some("2026-02-01"), 3, 2, DEFAULT_HORIZON_DAYS);
//!     println!("{} training days ahead", preview.iter().filter(|d| d.is_training_day).count());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod schedule;
pub mod session;

// Re-export top-level types for convenience
pub use client::{
    auth, ApiError, ApiResult, ClientConfig, Credential, Envelope, RequestClient, RequestOptions,
    Transport,
};

pub use schedule::{
    month_load, project, project_from_str, CyclePlan, MonthLoad, SchedulePreviewEntry,
    DEFAULT_HORIZON_DAYS,
};

pub use api::{CommentTarget, CreateCycleRequest, CycleApi, CycleSummary, DayDuties};

pub use config::{Config, ConfigError, LoggingConfig};

pub use session::{SessionError, SessionStore};
