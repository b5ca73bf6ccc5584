//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};

use crate::store::Mode;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "timer-dashboard")]
#[command(about = "Watch remote poker timers or run a local countdown")]
#[command(version)]
pub struct Config {
    /// Preferences file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the screen for the remembered mode
    Start,

    /// Remember the operating mode and open it
    Mode {
        #[arg(value_enum)]
        mode: Mode,
    },

    /// Save the server endpoint (`http://` is assumed when no scheme is given)
    Endpoint { url: String },

    /// Watch the timers reported by the server
    Dashboard {
        /// Server to watch instead of the saved endpoint
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Refresh quietly every N seconds (0 disables)
        #[arg(short, long, default_value = "0")]
        auto_refresh: u64,

        /// HTTP timeout in milliseconds
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,
    },

    /// Run a local countdown
    Timer {
        /// Countdown length in seconds
        #[arg(short, long, default_value = "20")]
        seconds: u64,
    },

    /// Look for timer servers on the local network
    Discover {
        /// How long to wait for replies, in milliseconds
        #[arg(long, default_value = "3000")]
        timeout_ms: u64,

        /// UDP port the servers listen on
        #[arg(long, default_value = "8888")]
        port: u16,
    },
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// The subcommand to run, `start` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Start)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl Command {
    /// Interval for quiet refreshes, if enabled
    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        match self {
            Command::Dashboard { auto_refresh, .. } if *auto_refresh > 0 => {
                Some(Duration::from_secs(*auto_refresh))
            }
            _ => None,
        }
    }
}
