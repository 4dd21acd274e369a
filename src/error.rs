//! Error types for config-watcher.

use std::fmt;
use std::path::{Path, PathBuf};

/// Boxed error type used at the reader and notification source boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for config-watcher operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while watching configuration.
///
/// Only [`WatchError::SourceUnavailable`], [`WatchError::InitialRead`] and
/// [`WatchError::NoRuntime`] are ever returned from the start operation. Every
/// other variant is delivered to the configured error handler while the
/// session keeps running.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The notification source could not be opened for the given path.
    #[error("Failed to watch {}: {reason}", path.display())]
    SourceUnavailable {
        /// The path that could not be watched
        path: PathBuf,
        /// The underlying notification error
        reason: BoxError,
    },

    /// The notification source reported a failure while running.
    #[error("Notification source error: {0}")]
    Source(BoxError),

    /// The configuration reader returned an error.
    #[error("Configuration reader failed: {0}")]
    Reader(BoxError),

    /// The configuration reader panicked.
    #[error("Panic in configuration reader: {0}")]
    ReaderPanicked(String),

    /// The initial baseline could not be read.
    #[error("Failed to read initial configuration: {0}")]
    InitialRead(Box<WatchError>),

    /// The start operation was called outside of a tokio runtime.
    #[error("No tokio runtime available to drive the watcher")]
    NoRuntime,

    /// Failed to load configuration from a file.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize configuration.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl WatchError {
    pub(crate) fn unavailable(path: &Path, reason: impl Into<BoxError>) -> Self {
        Self::SourceUnavailable {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error came out of the configuration reader.
    pub fn is_reader_failure(&self) -> bool {
        matches!(self, Self::Reader(_) | Self::ReaderPanicked(_))
    }
}

/// Validation error for configuration validation.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for WatchError {
    fn from(err: ValidationError) -> Self {
        WatchError::ValidationError(err.to_string())
    }
}
