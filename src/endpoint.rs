//! Server endpoint validation and normalization

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DashboardError;

/// Path of the timer listing relative to the server root
const TIMERS_PATH: [&str; 2] = ["api", "timers"];

/// A validated server endpoint: an absolute URL with an `http` or `https` scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(Url);

impl Endpoint {
    /// Parse a string that must already be a well-formed absolute URL.
    pub fn parse(input: &str) -> Result<Self, DashboardError> {
        let url = Url::parse(input)
            .map_err(|e| DashboardError::invalid_endpoint(input, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DashboardError::invalid_endpoint(
                    input,
                    format!("unsupported scheme `{}`", other),
                ))
            }
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(DashboardError::invalid_endpoint(input, "missing host"));
        }

        Ok(Self(url))
    }

    /// Normalize user input the way the endpoint-entry screen does: trim it,
    /// reject it when empty, and assume `http://` when no scheme was typed.
    pub fn normalize(input: &str) -> Result<Self, DashboardError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DashboardError::invalid_endpoint(input, "endpoint is empty"));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::parse(trimmed)
        } else {
            Self::parse(&format!("http://{}", trimmed))
        }
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// URL of the timer listing served under this endpoint
    pub fn timers_url(&self) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(TIMERS_PATH);
        }
        url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(Endpoint::parse("http://192.168.4.1").is_ok());
        assert!(Endpoint::parse("https://timers.example.com").is_ok());
        assert!(Endpoint::parse("http://10.0.0.2:3000/").is_ok());
    }

    #[test]
    fn rejects_relative_and_foreign_urls() {
        assert!(matches!(
            Endpoint::parse("not a url"),
            Err(DashboardError::InvalidEndpoint { .. })
        ));
        assert!(Endpoint::parse("ftp://timers.example.com").is_err());
        assert!(Endpoint::parse("mailto:someone@example.com").is_err());
        assert!(Endpoint::parse("").is_err());
    }

    #[test]
    fn normalize_adds_missing_scheme() {
        let endpoint = Endpoint::normalize("  192.168.4.1:3000 ").unwrap();
        assert_eq!(endpoint.as_str(), "http://192.168.4.1:3000/");

        let endpoint = Endpoint::normalize("https://timers.example.com").unwrap();
        assert_eq!(endpoint.url().scheme(), "https");
    }

    #[test]
    fn normalize_rejects_blank_and_garbage() {
        assert!(Endpoint::normalize("   ").is_err());
        assert!(Endpoint::normalize("not a url").is_err());
    }

    #[test]
    fn timers_url_appends_api_path() {
        let endpoint = Endpoint::parse("http://10.0.0.2:3000").unwrap();
        assert_eq!(endpoint.timers_url().as_str(), "http://10.0.0.2:3000/api/timers");

        let endpoint = Endpoint::parse("https://example.com/poker/").unwrap();
        assert_eq!(endpoint.timers_url().as_str(), "https://example.com/poker/api/timers");
    }

    #[test]
    fn serde_rejects_invalid_endpoint() {
        let parsed: Result<Endpoint, _> = serde_json::from_str("\"gopher://x\"");
        assert!(parsed.is_err());

        let parsed: Endpoint = serde_json::from_str("\"http://x.example\"").unwrap();
        assert_eq!(parsed.as_str(), "http://x.example/");
    }
}
