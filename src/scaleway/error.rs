//! Error types for the Scaleway backend.

use crate::config::ConfigError;
use scaleway_rs::ScalewayError;
use thiserror::Error;

/// Errors raised by the Scaleway backend.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScalewayBackendError {
    /// Raised when the high-level configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the watched server is no longer listed.
    #[error("server {server_id} not found in zone {zone}")]
    ServerNotFound {
        /// Provider server identifier.
        server_id: String,
        /// Zone used for the lookup.
        zone: String,
    },
    /// Wrapper for provider level failures.
    #[error("provider error: {message}")]
    Provider {
        /// Message returned by the provider SDK.
        message: String,
    },
}

impl From<ScalewayError> for ScalewayBackendError {
    fn from(value: ScalewayError) -> Self {
        Self::Provider {
            message: value.to_string(),
        }
    }
}

impl From<ConfigError> for ScalewayBackendError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
