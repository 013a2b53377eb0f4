//! Runtime configuration for the command host.
//!
//! Sources, later ones win:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `RELAY_CHANNEL_CAPACITY` / `RELAY_LOG` environment variables

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{MessageFormat, RenderOptions};

pub const ENV_CHANNEL_CAPACITY: &str = "RELAY_CHANNEL_CAPACITY";
pub const ENV_LOG: &str = "RELAY_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Requests that may queue up before `invoke` waits for the host.
    pub channel_capacity: usize,
    pub message_format: MessageFormat,
    pub preserve_cause_chain: bool,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            message_format: MessageFormat::Chain,
            preserve_cause_chain: true,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

impl RelayConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// `load` with an explicit override source. Validation runs once, after
    /// every layer has been applied.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.with_overrides(lookup)
    }

    /// Applies overrides from `lookup` (the environment in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CHANNEL_CAPACITY) {
            self.channel_capacity = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CHANNEL_CAPACITY,
                value: raw.clone(),
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "channel_capacity",
                value: self.channel_capacity.to_string(),
            });
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.message_format,
            preserve_cause_chain: self.preserve_cause_chain,
        }
    }
}
