//! Timer Dashboard - a client for remote poker timers
//!
//! This library provides the dashboard view-state controller, the fetcher and
//! preference-store contracts it depends on, and the local countdown used by
//! the timer mode.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod mode_gate;
pub mod render;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use endpoint::Endpoint;
pub use error::DashboardError;
pub use mode_gate::{initial_screen, Screen};
pub use services::{FetchError, FetchErrorKind, HttpFetcher, ResourceFetcher};
pub use state::{DashboardController, RefreshOutcome, TimerResource, ViewState};
pub use store::{ConfigStore, Configuration, Mode};
pub use utils::signals::shutdown_signal;
