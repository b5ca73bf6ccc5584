//! External service integration module
//!
//! This module contains the resource fetching contract, its HTTP
//! implementation and LAN discovery of timer servers.

pub mod discovery;
pub mod fetcher;
pub mod http;

// Re-export main types
pub use discovery::{discover_servers, DiscoveryConfig, DiscoveryError};
pub use fetcher::{FetchError, FetchErrorKind, ResourceFetcher};
pub use http::HttpFetcher;
