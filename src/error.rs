//! Error types for repoman
//!
//! The classification logic itself is total and never fails. Everything in
//! here describes failures at the boundaries: configuration, the hosting API
//! and writing reports.

use thiserror::Error;

/// Main error type for repoman
#[derive(Error, Debug)]
pub enum RepomanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Hosting API errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Report output errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// The audit did not finish in the configured time
    #[error("Audit timed out after {seconds}s")]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// The audit was interrupted by the user
    #[error("Audit cancelled")]
    Cancelled,
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the configuration
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A required setting was not supplied by any source
    #[error("Missing required setting '{name}' ({hint})")]
    Missing {
        /// Setting name
        name: &'static str,
        /// Where the setting can be supplied
        hint: &'static str,
    },

    /// A setting was supplied but is not usable
    #[error("Invalid value for '{name}': {reason}")]
    Invalid {
        /// Setting name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Refusing to overwrite an existing configuration file
    #[error("Config file '{path}' already exists (use --force to overwrite)")]
    AlreadyExists {
        /// Path to the existing file
        path: String,
    },
}

/// Errors returned by the hosting API client
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The client could not be constructed
    #[error("Failed to build GitHub client: {message}")]
    Client {
        /// Description of the failure
        message: String,
    },

    /// The API rejected the request (authorization, missing resource, ...)
    #[error("GitHub API error on {endpoint}: {message}")]
    Api {
        /// Requested endpoint
        endpoint: String,
        /// Message returned by the API
        message: String,
    },

    /// The response could not be decoded
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode {
        /// Requested endpoint
        endpoint: String,
        /// Decoder message
        message: String,
    },

    /// The request never produced a response
    #[error("Request to {endpoint} failed: {message}")]
    Transport {
        /// Requested endpoint
        endpoint: String,
        /// Transport message
        message: String,
    },
}

/// Errors raised while rendering or writing a report
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to serialize the report
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write the report
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        /// Destination path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for RepomanError {
    fn from(err: serde_json::Error) -> Self {
        RepomanError::Output(OutputError::Json(err))
    }
}

impl From<toml::de::Error> for RepomanError {
    fn from(err: toml::de::Error) -> Self {
        RepomanError::Config(ConfigError::Parse(err))
    }
}

impl From<toml::ser::Error> for RepomanError {
    fn from(err: toml::ser::Error) -> Self {
        RepomanError::Config(ConfigError::Serialize(err))
    }
}
