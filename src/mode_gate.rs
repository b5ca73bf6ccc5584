//! Startup routing based on the remembered mode and endpoint

use crate::{
    endpoint::Endpoint,
    store::{Configuration, Mode},
};

/// Screen the client opens on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    ModeSelection,
    Timer,
    EndpointEntry,
    Dashboard(Endpoint),
}

/// Decide the first screen from the persisted configuration
pub fn initial_screen(config: &Configuration) -> Screen {
    match (config.last_mode, &config.server_endpoint) {
        (Some(Mode::Timer), _) => Screen::Timer,
        (Some(Mode::Dashboard), Some(endpoint)) => Screen::Dashboard(endpoint.clone()),
        (Some(Mode::Dashboard), None) => Screen::EndpointEntry,
        (None, _) => Screen::ModeSelection,
    }
}
