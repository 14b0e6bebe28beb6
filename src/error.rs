//! Error types for logz
//!
//! Logging calls themselves never fail; these errors only surface from
//! configuration loading, engine construction and explicit synchronization.

use thiserror::Error;

/// Main error type for logz operations
#[derive(Error, Debug)]
pub enum LogzError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigFileMissing(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Invalid output path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O errors (sink writes, file opening, etc.)
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    /// Sink synchronization errors
    #[error("Sync error: {0}")]
    SyncError(String),
}

/// Result type alias for logz operations
pub type Result<T> = std::result::Result<T, LogzError>;

impl LogzError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new invalid path error
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a new sync error
    pub fn sync<S: Into<String>>(msg: S) -> Self {
        Self::SyncError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let config_err = LogzError::config("Invalid configuration");
        assert!(matches!(config_err, LogzError::ConfigError(_)));
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Invalid configuration"
        );

        let path_err = LogzError::invalid_path("");
        assert!(matches!(path_err, LogzError::InvalidPath(_)));
        assert_eq!(path_err.to_string(), "Invalid path: ");
    }

    #[test]
    fn test_error_from_conversions() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let logz_error: LogzError = io_error.into();
        assert!(matches!(logz_error, LogzError::IoError { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json").unwrap_err();
        let logz_error: LogzError = json_error.into();
        assert!(matches!(logz_error, LogzError::SerializationError { .. }));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("level = ").unwrap_err();
        let logz_error: LogzError = toml_error.into();
        assert!(matches!(logz_error, LogzError::TomlError { .. }));
        assert!(logz_error.to_string().starts_with("TOML parsing error:"));
    }

    #[test]
    fn test_error_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let logz_error: LogzError = io_error.into();

        let error_string = logz_error.to_string();
        assert!(error_string.contains("Access denied"));
    }
}
