//! Core error types for tiltclock-core.
//!
//! Every fallible operation in the library reports through one of the
//! enums below. Only [`WeatherError`] ever reaches the user as text; the
//! others surface from the CLI or are swallowed by the fallback pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tiltclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Weather fetch errors
    #[error("{0}")]
    Weather(#[from] WeatherError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the weather request itself.
///
/// The `Display` text is what the weather panel shows under the demo report.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Transport failure (DNS, connect, TLS, timeout)
    #[error("Failed to fetch weather data: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status
    #[error("Weather API error: {0}")]
    Status(u16),

    /// Body was not the expected JSON shape
    #[error("Malformed weather response: {0}")]
    Decode(String),

    /// Endpoint could not be turned into a request URL
    #[error("Invalid weather endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Geolocation failures. Never shown to the user; the pipeline falls back
/// to the default city.
#[derive(Error, Debug)]
pub enum GeolocationError {
    #[error("geolocation unavailable")]
    Unavailable,

    #[error("geolocation timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Dotted key does not name a config field
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No home directory and no override
    #[error("could not determine a configuration directory")]
    NoHomeDir,
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Alarm time is not a 24-hour `HH:MM`
    #[error("Invalid alarm time '{0}': expected 24-hour HH:MM")]
    InvalidAlarmTime(String),

    /// Countdown entry contained something other than 0-9
    #[error("Invalid countdown digit '{0}'")]
    InvalidDigit(char),

    /// Countdown entry was longer than the six HHMMSS digits
    #[error("Countdown entry '{0}' exceeds 6 digits")]
    TooManyDigits(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
