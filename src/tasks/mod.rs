//! Background tasks module
//!
//! This module contains background tasks that run alongside the screens.

pub mod auto_refresh;
pub mod countdown;

// Re-export main functions
pub use auto_refresh::auto_refresh_task;
pub use countdown::{countdown_task, CountdownOutcome, CountdownState, DEFAULT_COUNTDOWN};
