//! Serializable logger configuration
//!
//! The same settings the builder exposes, in a form that can be loaded from
//! JSON or the environment and re-applied to a running logger.
//!
//! ```
//! use rust_vlog_system::LoggerConfig;
//!
//! let config = LoggerConfig::from_json(r#"{ "verbosity": 2, "vmodule": "conn=4" }"#).unwrap();
//! assert_eq!(config.verbosity, 2);
//! assert_eq!(config.vmodule, "conn=4");
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use serde::{Deserialize, Serialize};

/// Environment variable holding the global V-level
pub const ENV_VERBOSITY: &str = "VLOG_V";

/// Environment variable holding the vmodule spec
pub const ENV_VMODULE: &str = "VLOG_VMODULE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Global V-level threshold
    pub verbosity: i32,
    /// `pattern=level,...` overrides
    pub vmodule: String,
    /// Lowest severity that is written
    pub min_level: LogLevel,
    pub format: OutputFormat,
    /// Colorize the severity tag (text format, `console` feature)
    pub colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            vmodule: String::new(),
            min_level: LogLevel::Info,
            format: OutputFormat::Text,
            colors: false,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by `VLOG_V` and `VLOG_VMODULE` when set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_VERBOSITY) {
            config.verbosity = raw.trim().parse().map_err(|_| {
                LoggerError::config(ENV_VERBOSITY, format!("'{}' is not an integer", raw))
            })?;
        }
        if let Some(spec) = lookup(ENV_VMODULE) {
            config.vmodule = spec;
        }

        Ok(config)
    }
}
