//! Error handling for Driver Studio
//!
//! This module defines the application error type and a Result alias for use
//! throughout the crate. Every recoverable error can be turned into a
//! user-facing notification through [`StudioError::title`].

use thiserror::Error;

/// Main error type for Driver Studio operations
#[derive(Error, Debug)]
pub enum StudioError {
    /// Candidate document does not have the shape of the reference format
    #[error("Configuration format mismatch: {0}")]
    ShapeMismatch(String),

    /// A numeric leaf is NaN or infinite
    #[error("Contains invalid number at '{path}'")]
    InvalidNumber { path: String },

    /// JSON value that cannot be represented as a schema object
    #[error("Unsupported value at '{path}': {reason}")]
    UnsupportedValue { path: String, reason: String },

    /// CSV log that cannot be plotted
    #[error("Malformed log file: {0}")]
    MalformedLog(String),

    /// Save target missing or with the wrong extension
    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sidecar process failed or returned an unreadable reply
    #[error("Sidecar error: {0}")]
    Sidecar(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StudioError>,
    },
}

impl StudioError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StudioError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Short title used when the error is shown as a notification
    pub fn title(&self) -> &'static str {
        match self {
            StudioError::ShapeMismatch(_) => "Format mismatch",
            StudioError::InvalidNumber { .. } => "Invalid number",
            StudioError::UnsupportedValue { .. } => "Unsupported document",
            StudioError::MalformedLog(_) => "Malformed log file",
            StudioError::InvalidPath(_) => "Invalid file path",
            StudioError::Config(_) => "Configuration error",
            StudioError::Sidecar(_) => "Device command failed",
            StudioError::Channel(_) => "Internal error",
            StudioError::Io(_) => "File error",
            StudioError::Serialization(_) => "Invalid JSON",
            StudioError::WithContext { source, .. } => source.title(),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for StudioError {
    fn from(err: csv::Error) -> Self {
        StudioError::MalformedLog(err.to_string())
    }
}

/// Result type alias for Driver Studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StudioError::MalformedLog("need at least 2 rows".to_string());
        assert_eq!(err.to_string(), "Malformed log file: need at least 2 rows");
    }

    #[test]
    fn test_error_with_context() {
        let err = StudioError::InvalidPath("missing extension".to_string());
        let with_ctx = err.with_context("Failed to save configuration");
        assert!(with_ctx.to_string().contains("Failed to save configuration"));
        assert_eq!(with_ctx.title(), "Invalid file path");
    }

    #[test]
    fn test_distinct_load_messages() {
        let shape = StudioError::ShapeMismatch("missing key 'file'".to_string());
        let number = StudioError::InvalidNumber {
            path: "limits.speed".to_string(),
        };
        assert!(shape.to_string().contains("format mismatch"));
        assert!(number.to_string().contains("invalid number"));
        assert!(number.to_string().contains("limits.speed"));
        assert_ne!(shape.title(), number.title());
    }

    #[test]
    fn test_context_on_result() {
        let result: Result<()> = Err(StudioError::Sidecar("exit code 2".to_string()));
        let err = result.context("config.get").unwrap_err();
        assert_eq!(err.to_string(), "config.get: Sidecar error: exit code 2");
    }
}
