//! nexttrack - streaming client for a track recommendation service
//!
//! Sends a listening history and taste preferences to the service and
//! follows the server-sent-event stream it answers with, keeping a ranked
//! view of candidate tracks while the stream is open.
//!
//! - [`sse`] turns response bytes into typed events
//! - [`state`] applies events to a [`state::StreamState`]
//! - [`session`] runs one request/stream lifecycle and publishes snapshots
//!
//! # Example
//!
//! ```ignore
//! use nexttrack::{ClientConfig, Preferences, RecommendationClient, RecommendationRequest, SessionController};
//!
//! let client = RecommendationClient::from_config(&ClientConfig::load()?)?;
//! let controller = SessionController::new(client);
//! let request = RecommendationRequest::new(["Yesterday - Beatles"], Preferences::default())?;
//! let final_state = controller.submit(request).wait().await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod state;
pub mod traits;

pub use client::RecommendationClient;
pub use config::ClientConfig;
pub use models::{Preferences, RecommendationRequest};
pub use session::{SessionController, SessionHandle};
pub use state::StreamState;
