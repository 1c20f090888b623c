//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::poll::{PollSettings, PollSettingsError};

/// Default delay between status fetches, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default polling budget, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;

/// Scaleway specific configuration derived from environment variables and
/// top-level keys of `lookout.toml`.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "SCW",
    discovery(
        app_name = "lookout",
        env_var = "LOOKOUT_CONFIG_PATH",
        config_file_name = "lookout.toml",
        dotfile_name = ".lookout.toml",
        project_file_name = "lookout.toml"
    )
)]
pub struct ScalewayConfig {
    /// Secret key used for authentication. This value is required.
    pub secret_key: String,
    /// Project identifier used to scope private image listings.
    pub default_project_id: Option<String>,
    /// Zone whose catalogue and servers are queried. Defaults to `fr-par-1`.
    #[ortho_config(default = "fr-par-1".to_owned())]
    pub default_zone: String,
    /// CPU architecture used to select image variants.
    #[ortho_config(default = "x86_64".to_owned())]
    pub default_architecture: String,
}

/// Polling cadence for waits on remote state.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "LOOKOUT_POLL",
    discovery(
        app_name = "lookout",
        env_var = "LOOKOUT_CONFIG_PATH",
        config_file_name = "lookout.toml",
        dotfile_name = ".lookout.toml",
        project_file_name = "lookout.toml"
    )
)]
pub struct PollConfig {
    /// Seconds between status fetches.
    #[ortho_config(default = DEFAULT_POLL_INTERVAL_SECS)]
    pub interval_secs: u64,
    /// Total seconds to wait before giving up.
    #[ortho_config(default = DEFAULT_POLL_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to lookout.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(metadata.missing());
    }
    Ok(())
}

impl ScalewayConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("lookout")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_field(
            &self.secret_key,
            &FieldMetadata::new(
                "Scaleway API secret key",
                "SCW_SECRET_KEY",
                "secret_key",
            ),
        )?;
        require_field(
            &self.default_zone,
            &FieldMetadata::new(
                "availability zone",
                "SCW_DEFAULT_ZONE",
                "default_zone",
            ),
        )?;
        require_field(
            &self.default_architecture,
            &FieldMetadata::new(
                "CPU architecture",
                "SCW_DEFAULT_ARCHITECTURE",
                "default_architecture",
            ),
        )?;
        if self
            .default_project_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(FieldMetadata::new(
                "Scaleway project ID",
                "SCW_DEFAULT_PROJECT_ID",
                "default_project_id",
            )
            .missing());
        }
        Ok(())
    }
}

impl PollConfig {
    /// Loads polling configuration without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("lookout")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Converts the configured seconds into [`PollSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPoll`] when the interval is zero.
    pub fn settings(&self) -> Result<PollSettings, ConfigError> {
        let settings = PollSettings::new(
            Duration::from_secs(self.interval_secs),
            Duration::from_secs(self.timeout_secs),
        );
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
    /// Polling cadence cannot drive a wait.
    #[error("invalid polling configuration (LOOKOUT_POLL_INTERVAL_SECS): {0}")]
    InvalidPoll(#[from] PollSettingsError),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
