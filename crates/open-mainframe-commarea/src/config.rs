//! Gateway connection settings.
//!
//! Settings come from a TOML file with a `[gateway]` table, overridden by
//! `COMMAREA_*` environment variables:
//!
//! ```toml
//! [gateway]
//! server = "CICSA"
//! user = "OPER1"
//! transaction = "ORD1"
//! commarea_size = 4096
//! ```

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Largest commarea a gateway call can carry.
pub const MAX_COMMAREA_SIZE: usize = 32500;

/// Default commarea size.
pub const DEFAULT_COMMAREA_SIZE: usize = MAX_COMMAREA_SIZE;

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gateway settings.
    pub gateway: GatewayConfig,
}

/// Connection and request settings for the transaction gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server (region) name.
    pub server: String,
    /// User id.
    pub user: String,
    /// Password.
    pub password: String,
    /// Mirror transaction id.
    pub transaction: String,
    /// Transaction program name used for security.
    pub tpn: String,
    /// Size the commarea is padded to.
    pub commarea_size: usize,
    /// Log record dumps around every call.
    pub trace: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            user: String::new(),
            password: String::new(),
            transaction: String::new(),
            tpn: String::new(),
            commarea_size: DEFAULT_COMMAREA_SIZE,
            trace: false,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `COMMAREA_*` environment variables.
    pub fn apply_env_vars(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let gateway = &mut self.gateway;
        if let Some(val) = lookup("COMMAREA_SERVER") {
            gateway.server = val;
        }
        if let Some(val) = lookup("COMMAREA_USER") {
            gateway.user = val;
        }
        if let Some(val) = lookup("COMMAREA_TRANSACTION") {
            gateway.transaction = val;
        }
        if let Some(val) = lookup("COMMAREA_TPN") {
            gateway.tpn = val;
        }
        if let Some(val) = lookup("COMMAREA_SIZE") {
            match val.parse() {
                Ok(size) => gateway.commarea_size = size,
                Err(_) => warn!(value = %val, "ignoring unparsable COMMAREA_SIZE"),
            }
        }
        if let Some(val) = lookup("COMMAREA_TRACE") {
            gateway.trace = matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
    }

    /// Check field limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            message: e.to_string(),
        })
    }
}

impl GatewayConfig {
    /// Check field limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commarea_size == 0 || self.commarea_size > MAX_COMMAREA_SIZE {
            return Err(ConfigError::Invalid {
                field: "commarea_size".to_string(),
                message: format!(
                    "{} is outside 1..={}",
                    self.commarea_size, MAX_COMMAREA_SIZE
                ),
            });
        }
        check_len("server", &self.server, 8)?;
        check_len("transaction", &self.transaction, 4)?;
        check_len("tpn", &self.tpn, 4)?;
        Ok(())
    }
}

pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), ConfigError> {
    if value.chars().count() > max {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            message: format!("'{}' is longer than {} characters", value, max),
        });
    }
    Ok(())
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error for {}: {message}", .path.display())]
    #[diagnostic(code(commarea::config::io))]
    IoError {
        /// File path.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },

    /// Parse error in the config file.
    #[error("parse error in {}: {message}", .path.display())]
    #[diagnostic(code(commarea::config::parse))]
    ParseError {
        /// File path.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {message}")]
    #[diagnostic(code(commarea::config::serialize))]
    SerializeError {
        /// Underlying error text.
        message: String,
    },

    /// A setting is out of range.
    #[error("invalid {field}: {message}")]
    #[diagnostic(code(commarea::config::invalid))]
    Invalid {
        /// Setting name.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}
