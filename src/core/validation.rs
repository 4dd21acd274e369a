//! Configuration validation support.

use crate::error::ValidationError;

/// Trait for configuration validation.
///
/// Implement this on your configuration type and build the reader with
/// [`FileReader::validated`](crate::sources::FileReader::validated). A file
/// that fails validation is reported through the error handler and the watcher
/// keeps delivering changes relative to the last good value.
///
/// # Examples
///
/// ```rust
/// use config_watcher::core::Validate;
/// use config_watcher::error::ValidationError;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, Clone)]
/// struct ListenerConfig {
///     bind: String,
///     workers: usize,
/// }
///
/// impl Validate for ListenerConfig {
///     fn validate(&self) -> Result<(), ValidationError> {
///         let mut errors = Vec::new();
///         if !self.bind.contains(':') {
///             errors.push(ValidationError::invalid_field("bind", "expected host:port"));
///         }
///         if self.workers == 0 {
///             errors.push(ValidationError::invalid_field("workers", "must be greater than 0"));
///         }
///
///         match errors.len() {
///             0 => Ok(()),
///             1 => Err(errors.remove(0)),
///             _ => Err(ValidationError::Multiple(errors)),
///         }
///     }
/// }
///
/// let cfg = ListenerConfig { bind: "0.0.0.0".into(), workers: 0 };
/// assert!(matches!(cfg.validate(), Err(ValidationError::Multiple(_))));
/// ```
pub trait Validate {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` describing which check failed.
    fn validate(&self) -> Result<(), ValidationError>;
}
