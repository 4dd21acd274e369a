//! Configuration reader trait and the panic-isolating call boundary.

use crate::error::{BoxError, WatchError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Produces the current configuration value.
///
/// Readers are opaque to the watcher: they may be slow, fail, or panic. Any
/// closure returning a `Result` is a reader.
///
/// # Examples
///
/// ```rust
/// use config_watcher::sources::ConfigReader;
///
/// let reader = || Ok::<_, std::io::Error>("port: 8080".to_string());
/// assert_eq!(reader.read().unwrap(), "port: 8080");
/// ```
pub trait ConfigReader<T>: Send + Sync + 'static {
    /// Read the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be produced. The watcher
    /// reports it and keeps the previous baseline.
    fn read(&self) -> std::result::Result<T, BoxError>;
}

impl<T, E, F> ConfigReader<T> for F
where
    F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn read(&self) -> std::result::Result<T, BoxError> {
        self().map_err(Into::into)
    }
}

/// Call the reader, converting both errors and panics into [`WatchError`].
pub(crate) fn read_isolated<T, R>(reader: &R) -> Result<T, WatchError>
where
    R: ConfigReader<T> + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| reader.read())) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(WatchError::Reader(err)),
        Err(payload) => Err(WatchError::ReaderPanicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_closure_reader() {
        let reader = || Ok::<_, io::Error>(42);
        assert_eq!(read_isolated(&reader).unwrap(), 42);
    }

    #[test]
    fn test_reader_error_is_wrapped() {
        let reader = || Err::<u32, _>(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = read_isolated(&reader).unwrap_err();
        assert!(matches!(err, WatchError::Reader(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_panic_is_caught() {
        let reader = || -> Result<u32, io::Error> { panic!("simulated panic in reader") };
        let err = read_isolated(&reader).unwrap_err();
        match err {
            WatchError::ReaderPanicked(msg) => assert_eq!(msg, "simulated panic in reader"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_formatted_panic_message() {
        let attempt = 3;
        let reader = move || -> Result<u32, io::Error> { panic!("attempt {attempt} failed") };
        let err = read_isolated(&reader).unwrap_err();
        assert_eq!(err.to_string(), "Panic in configuration reader: attempt 3 failed");
    }
}
