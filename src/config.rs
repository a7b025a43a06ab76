//! Configuration and CLI argument handling

use clap::Parser;
use thiserror::Error;

use crate::{
    chain::{ThresholdSet, DEFAULT_PRIMARY_THRESHOLD, DEFAULT_VOLUME},
    services::provider::DEFAULT_API_URL,
    state::Mode,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "chain-alarm")]
#[command(about = "A state-managed HTTP server that sounds alarms as a game chain runs out")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20560")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Primary alarm threshold in seconds (120, 90, 60, 45, 30, 20 or 15)
    #[arg(short, long, default_value_t = DEFAULT_PRIMARY_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: u32,

    /// Alarm volume in percent
    #[arg(long, default_value_t = DEFAULT_VOLUME, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: u8,

    /// API key for the remote chain status provider
    #[arg(long, env = "CHAIN_ALARM_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Start in manual or synced mode
    #[arg(short, long, value_enum, default_value_t = Mode::Manual)]
    pub mode: Mode,

    /// Base URL of the remote chain status provider
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Rejected settings input
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Threshold must be one of 120, 90, 60, 45, 30, 20 or 15 seconds, got {0}")]
    InvalidThreshold(i64),

    #[error("Volume must be between 0 and 100, got {0}")]
    InvalidVolume(i64),
}

/// Validate a primary threshold coming from outside the core
pub fn validate_threshold(value: i64) -> Result<u32, SettingsError> {
    u32::try_from(value)
        .ok()
        .filter(|threshold| ThresholdSet::is_allowed_primary(*threshold))
        .ok_or(SettingsError::InvalidThreshold(value))
}

/// Validate a volume percentage coming from outside the core
pub fn validate_volume(value: i64) -> Result<u8, SettingsError> {
    u8::try_from(value)
        .ok()
        .filter(|volume| *volume <= 100)
        .ok_or(SettingsError::InvalidVolume(value))
}

fn parse_threshold(raw: &str) -> Result<u32, String> {
    let value: i64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", raw))?;
    validate_threshold(value).map_err(|e| e.to_string())
}
