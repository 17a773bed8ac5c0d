//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use launchkit_core::control::SessionType;

use crate::error::ConfigError;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("/bin/launchctl")
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub launchctl: LaunchctlConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            launchctl: LaunchctlConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.launchctl.binary.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "launchctl.binary".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.launchctl.default_domain.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "launchctl.default_domain".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// How launchctl is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchctlConfig {
    /// Path to the launchctl executable.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Domain passed to `load`/`unload` when none is given.
    #[serde(default)]
    pub default_domain: Option<String>,

    /// Session type passed to `load`/`unload` when none is given.
    #[serde(default)]
    pub default_session_type: Option<SessionType>,
}

impl Default for LaunchctlConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            default_domain: None,
            default_session_type: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
