//! Error types shared across the runner.
//!
//! Every error ends at the console: the runner prints it and decides whether
//! the run continues. Nothing here crosses a process boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a decoded response from the API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connect failure, timeout, or any other error raised by the HTTP client.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but the body was not JSON.
    #[error("response from {url} (HTTP {status}) is not valid JSON: {reason}")]
    Decode {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("invalid request URL '{0}'")]
    InvalidUrl(String),
}

/// Problems with the verification code typed by the operator.
#[derive(Debug, Error)]
pub enum CodeInputError {
    #[error("no verification code entered")]
    Empty,

    #[error("verification code '{0}' is malformed (expected 6 digits)")]
    Malformed(String),

    #[error("failed to read verification code: {0}")]
    Read(#[from] std::io::Error),
}

/// Invalid runner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("base URL '{0}' must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}
