//! State management module
//!
//! This module contains the dashboard view state and the controller that
//! drives it.

pub mod controller;
pub mod view_state;

// Re-export main types
pub use controller::{DashboardController, RefreshOutcome};
pub use view_state::{TimerResource, ViewState};
