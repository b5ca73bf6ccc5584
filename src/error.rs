//! Error types shared by the dashboard controller and the endpoint parser

use thiserror::Error;

/// Errors returned by [`DashboardController`](crate::state::DashboardController)
/// and by endpoint validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The endpoint is not an absolute `http`/`https` URL
    #[error("invalid endpoint `{input}`: {reason}")]
    InvalidEndpoint { input: String, reason: String },

    /// The controller was disposed and accepts no further calls
    #[error("dashboard controller has been disposed")]
    Disposed,
}

impl DashboardError {
    pub(crate) fn invalid_endpoint(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
