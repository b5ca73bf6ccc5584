//! Process-level helpers shared by the dashboard and timer screens

pub mod signals;

pub use signals::shutdown_signal;
