//! Typed view over the persisted client preferences

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config_store::{ConfigKey, ConfigStore, StoreError};
use crate::endpoint::Endpoint;

/// Operating mode chosen on the mode selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Timer,
    Dashboard,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timer => "timer",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timer" => Ok(Self::Timer),
            "dashboard" => Ok(Self::Dashboard),
            other => Err(format!("unknown mode `{}`", other)),
        }
    }
}

/// Everything the client remembers between runs. Both fields are unset on first run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub last_mode: Option<Mode>,
    pub server_endpoint: Option<Endpoint>,
}

impl Configuration {
    /// Read the configuration. Unreadable values are treated as unset.
    pub fn load(store: &dyn ConfigStore) -> Self {
        let last_mode = store.get(ConfigKey::LastMode).and_then(|raw| {
            raw.parse::<Mode>()
                .map_err(|e| warn!("Ignoring stored mode: {}", e))
                .ok()
        });

        let server_endpoint = store.get(ConfigKey::ServerEndpoint).and_then(|raw| {
            Endpoint::parse(&raw)
                .map_err(|e| warn!("Ignoring stored endpoint: {}", e))
                .ok()
        });

        Self {
            last_mode,
            server_endpoint,
        }
    }
}

pub fn save_mode(store: &dyn ConfigStore, mode: Mode) -> Result<(), StoreError> {
    store.set(ConfigKey::LastMode, mode.as_str())
}

/// Only validated endpoints can be written, which keeps the stored value a valid URL
pub fn save_endpoint(store: &dyn ConfigStore, endpoint: &Endpoint) -> Result<(), StoreError> {
    store.set(ConfigKey::ServerEndpoint, endpoint.as_str())
}
