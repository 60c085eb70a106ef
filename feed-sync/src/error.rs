//! Unified error types for the feed sync crate
//!
//! This module defines error types for each layer:
//! - `FetchError`: failures reported by a feed port (transport or server)
//! - `ConfigError`: invalid or missing environment configuration
//! - `AppError`: application layer errors (wraps the above for callers)

use thiserror::Error;

/// Errors reported by the fetch ports
///
/// Always recoverable: the engine returns the affected direction to idle and
/// leaves the snapshot untouched. `Clone` so a failure can be handed to every
/// failure subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Unauthorized - invalid or expired token")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Application layer errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Feed sync has stopped")]
    EngineStopped,
}
