//! Preference persistence module
//!
//! This module contains the key/value store contract, its in-memory and
//! file-backed implementations, and the typed configuration built on top.

pub mod config_store;
pub mod preferences;

// Re-export main types
pub use config_store::{ConfigKey, ConfigStore, FileConfigStore, MemoryConfigStore, StoreError};
pub use preferences::{save_endpoint, save_mode, Configuration, Mode};
