//! HTTP implementation of the resource fetcher

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::fetcher::{FetchError, ResourceFetcher};
use crate::{endpoint::Endpoint, state::TimerResource};

/// Default connect and request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Fetches `GET {endpoint}/api/timers` and reads the JSON object it returns
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Timer servers sit on the local network, so system proxies are bypassed
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::connection_refused(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<TimerResource>, FetchError> {
        let url = endpoint.timers_url();
        debug!("Fetching timers from {}", url);

        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::server_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response.text().await.map_err(classify)?;
        parse_timers(&body)
    }
}

/// Map a transport error onto the fetch error taxonomy
fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(error.to_string())
    } else if error.is_decode() || error.is_body() {
        FetchError::malformed(error.to_string())
    } else if let Some(status) = error.status() {
        FetchError::server_error(status.as_u16(), error.to_string())
    } else {
        // Connect failures, DNS failures and resets all mean the server is unreachable
        FetchError::connection_refused(error.to_string())
    }
}

/// Parse a timer listing: a JSON object whose values are timer records keyed by device id.
///
/// Timers come back ordered by table number; records without one sort as table 0.
pub fn parse_timers(body: &str) -> Result<Vec<TimerResource>, FetchError> {
    let listing: Map<String, Value> = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("expected a JSON object of timers: {}", e)))?;

    let mut timers = Vec::with_capacity(listing.len());
    for (key, record) in listing {
        if !record.is_object() {
            warn!("Skipping timer `{}`: record is not an object", key);
            continue;
        }

        let id = record
            .get("device_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or(key);

        timers.push(TimerResource::new(id, record));
    }

    timers.sort_by_key(|timer| timer.table_number().unwrap_or(0));
    Ok(timers)
}
