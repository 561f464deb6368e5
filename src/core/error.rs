//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed `pattern=level` entry in a vmodule spec
    #[error("Invalid vmodule entry '{entry}': {reason}")]
    InvalidVmodule { entry: String, reason: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create a vmodule format error for a single entry
    pub fn vmodule(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::InvalidVmodule {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::vmodule("gfs*", "missing '='");
        assert!(matches!(err, LoggerError::InvalidVmodule { .. }));

        let err = LoggerError::config("VLOG_V", "not an integer");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::vmodule("gfs*", "missing '='");
        assert_eq!(err.to_string(), "Invalid vmodule entry 'gfs*': missing '='");

        let err = LoggerError::config("VLOG_V", "not an integer");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for VLOG_V: not an integer"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: LoggerError = json_err.into();
        assert!(matches!(err, LoggerError::JsonError(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
