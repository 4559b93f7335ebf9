//! Error types for the script generator
//!
//! Provides structured error handling with context and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the script generator
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The command line does not start with a recognized Data Pump utility
    #[error("Format error: {message}")]
    Format { message: String, input: String },

    /// Required form fields are missing or malformed
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    /// Create a new command format error
    pub fn format(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            input: input.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message() {
        let err = ScriptError::format("Command must start with expdp or impdp", "exp hr/hr");
        assert_eq!(
            err.to_string(),
            "Format error: Command must start with expdp or impdp"
        );
        match err {
            ScriptError::Format { input, .. } => assert_eq!(input, "exp hr/hr"),
            _ => panic!("Expected Format error"),
        }
    }

    #[test]
    fn test_file_system_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScriptError::file_system("write", "/tmp/out.sql", io);
        assert!(err.to_string().contains("write failed on /tmp/out.sql"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
