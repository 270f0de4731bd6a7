//! Error handling types for razor-bridge
//!
//! This module provides the error type shared by the projection core, the
//! mapping layer and the configuration loader.

use thiserror::Error;

/// Comprehensive error type for projection and synchronization operations
#[derive(Debug, Error)]
pub enum RazorError {
    /// An update carried a host document version older than the one already applied
    #[error("Stale update for {uri}: incoming version {incoming} is older than {current}")]
    StaleUpdate {
        uri: String,
        incoming: i32,
        current: i32,
    },

    /// Document not tracked by the manager
    #[error("Document not found: {uri}")]
    DocumentNotFound { uri: String },

    /// URI could not be parsed or converted
    #[error("Invalid URI: {uri}")]
    InvalidUri { uri: String },

    /// The external Razor server failed or is not reachable
    #[error("Razor server error: {message}")]
    Server { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON payload could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML settings could not be decoded
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for razor-bridge operations
pub type RazorResult<T> = Result<T, RazorError>;

/// Helper functions for common error patterns
impl RazorError {
    /// Create a stale update error
    pub fn stale_update(uri: impl Into<String>, incoming: i32, current: i32) -> Self {
        RazorError::StaleUpdate {
            uri: uri.into(),
            incoming,
            current,
        }
    }

    /// Create a document not found error
    pub fn document_not_found(uri: impl Into<String>) -> Self {
        RazorError::DocumentNotFound { uri: uri.into() }
    }

    /// Create an invalid URI error
    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        RazorError::InvalidUri { uri: uri.into() }
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        RazorError::Server {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        RazorError::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        RazorError::Internal(message.into())
    }

    /// Whether this error is the version fence rejecting an out-of-order push.
    pub fn is_stale_update(&self) -> bool {
        matches!(self, RazorError::StaleUpdate { .. })
    }
}
