//! File-based configuration reader.

use super::ConfigReader;
use crate::error::{BoxError, ValidationError, WatchError};
use config::File;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "validation")]
use crate::core::Validate;

/// Type alias for typed validator functions.
type Validator<T> = Arc<dyn Fn(&T) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// Reader that loads and deserializes a configuration file on every call.
///
/// The format is detected from the file extension:
/// - `.yaml`, `.yml` -> YAML
/// - `.toml` -> TOML
/// - `.json` -> JSON
///
/// A validation failure is a reader failure: the watcher reports it and keeps
/// the last good configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use config_watcher::prelude::*;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, Clone)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let reader = FileReader::<AppConfig>::new("config/app.yaml").with_validation(|cfg| {
///     if cfg.port < 1024 {
///         return Err(ValidationError::invalid_field("port", "must be >= 1024"));
///     }
///     Ok(())
/// });
///
/// let cfg = reader.load()?;
/// println!("port: {}", cfg.port);
/// # Ok::<(), WatchError>(())
/// ```
pub struct FileReader<T> {
    path: PathBuf,
    validator: Option<Validator<T>>,
    _config: PhantomData<fn() -> T>,
}

impl<T> FileReader<T> {
    /// Create a reader for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            validator: None,
            _config: PhantomData,
        }
    }

    /// Reject loaded configurations that fail the given check.
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Validate loaded configurations with their [`Validate`] implementation.
    #[cfg(feature = "validation")]
    pub fn validated(self) -> Self
    where
        T: Validate,
    {
        self.with_validation(|config: &T| config.validate())
    }

    /// The file this reader loads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate that the file extension is supported.
    fn validate_extension(&self) -> Result<(), WatchError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                WatchError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" | "toml" | "json" => Ok(()),
            _ => Err(WatchError::LoadError(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }
}

impl<T: DeserializeOwned> FileReader<T> {
    /// Load, deserialize and validate the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The extension is not supported
    /// - The file is missing or cannot be parsed
    /// - Deserialization into `T` fails
    /// - Validation fails
    pub fn load(&self) -> Result<T, WatchError> {
        self.validate_extension()?;

        if !self.path.exists() {
            return Err(WatchError::LoadError(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let config = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| WatchError::LoadError(format!("Failed to load file: {}", e)))?;

        let value = config.try_deserialize::<T>().map_err(|e| {
            WatchError::DeserializationError(format!("Failed to deserialize configuration: {}", e))
        })?;

        if let Some(validator) = &self.validator {
            validator(&value)?;
        }

        Ok(value)
    }
}

impl<T> ConfigReader<T> for FileReader<T>
where
    T: DeserializeOwned + 'static,
{
    fn read(&self) -> std::result::Result<T, BoxError> {
        self.load().map_err(Into::into)
    }
}

impl<T> Clone for FileReader<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            validator: self.validator.clone(),
            _config: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FileReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileReader")
            .field("path", &self.path)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}
