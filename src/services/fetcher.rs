//! Resource fetching contract consumed by the dashboard controller

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::{endpoint::Endpoint, state::TimerResource};

/// Cause of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Timeout,
    ConnectionRefused,
    MalformedResponse,
    ServerError(u16),
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::ConnectionRefused => f.write_str("connection refused"),
            Self::MalformedResponse => f.write_str("malformed response"),
            Self::ServerError(status) => write!(f, "server error {}", status),
        }
    }
}

/// A failed fetch with its cause and transport detail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Timeout, message)
    }

    pub fn connection_refused(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::ConnectionRefused, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::MalformedResponse, message)
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::ServerError(status), message)
    }

    /// Message shown to the user in the error state
    pub fn user_message(&self) -> String {
        let summary = match self.kind {
            FetchErrorKind::Timeout => "The server did not respond in time".to_string(),
            FetchErrorKind::ConnectionRefused => {
                "Could not open a connection to the server".to_string()
            }
            FetchErrorKind::MalformedResponse => {
                "The server sent data that could not be read".to_string()
            }
            FetchErrorKind::ServerError(status) => {
                format!("The server answered with HTTP status {}", status)
            }
        };

        if self.message.is_empty() {
            summary
        } else {
            format!("{} ({})", summary, self.message)
        }
    }
}

/// Source of timer records for one endpoint.
///
/// Dropping the returned future cancels the fetch; implementations must not
/// produce side effects after that point.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + 'static {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<TimerResource>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_names_the_cause() {
        let message = FetchError::connection_refused("tcp connect error").user_message();
        assert!(message.to_lowercase().contains("connection"));
        assert!(message.contains("tcp connect error"));

        let message = FetchError::server_error(503, "").user_message();
        assert_eq!(message, "The server answered with HTTP status 503");

        assert!(FetchError::timeout("").user_message().contains("in time"));
    }

    #[test]
    fn display_includes_kind_and_detail() {
        let err = FetchError::malformed("expected an object");
        assert_eq!(err.to_string(), "malformed response: expected an object");
    }
}
