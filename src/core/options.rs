//! Options controlling a watch session.

use crate::error::WatchError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default quiet period before a burst of signals settles.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(10);

/// Callback invoked for every non-fatal error observed during a session.
pub type ErrorHandler = Arc<dyn Fn(WatchError) + Send + Sync>;

/// Logger capability used for watcher lifecycle and change messages.
///
/// Implementations receive pre-formatted arguments, so they can forward them to
/// any sink without re-parsing.
pub trait Logger: Send + Sync {
    /// Log a formatted message.
    fn log(&self, args: fmt::Arguments<'_>);
}

/// Logger that discards everything. This is the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _args: fmt::Arguments<'_>) {}
}

/// Logger that forwards messages to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "config_watcher", "{}", args);
    }
}

/// Options for a watch session.
///
/// Built once before the session starts and frozen afterwards.
///
/// # Examples
///
/// ```rust
/// use config_watcher::prelude::*;
/// use std::time::Duration;
///
/// let options = WatchOptions::new()
///     .with_debounce(Duration::from_millis(250))
///     .with_error_handler(|err| eprintln!("watch error: {err}"))
///     .with_logger(TracingLogger)
///     .with_change_logging(true);
///
/// assert_eq!(options.debounce(), Duration::from_millis(250));
/// assert!(options.logs_changes());
/// ```
#[derive(Clone)]
pub struct WatchOptions {
    debounce: Duration,
    error_handler: ErrorHandler,
    logger: Arc<dyn Logger>,
    log_changes: bool,
}

impl WatchOptions {
    /// Create options with the defaults: 10ms debounce, errors logged through
    /// `tracing`, no-op logger, change logging off.
    pub fn new() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            error_handler: Arc::new(|err| {
                tracing::error!(error = %err, "Watcher error");
            }),
            logger: Arc::new(NoopLogger),
            log_changes: false,
        }
    }

    /// Set the debounce duration.
    ///
    /// A zero duration settles on the next scheduler turn after a signal.
    pub fn with_debounce(mut self, duration: Duration) -> Self {
        self.debounce = duration;
        self
    }

    /// Set the handler that receives source and reader errors.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(WatchError) + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Inject a logger capability.
    pub fn with_logger<L: Logger + 'static>(mut self, logger: L) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Log every emitted change through the configured logger.
    pub fn with_change_logging(mut self, enabled: bool) -> Self {
        self.log_changes = enabled;
        self
    }

    /// Get the debounce duration.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Whether emitted changes are logged.
    pub fn logs_changes(&self) -> bool {
        self.log_changes
    }

    pub(crate) fn report(&self, err: WatchError) {
        (self.error_handler)(err);
    }

    pub(crate) fn log(&self, args: fmt::Arguments<'_>) {
        self.logger.log(args);
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchOptions")
            .field("debounce", &self.debounce)
            .field("log_changes", &self.log_changes)
            .finish_non_exhaustive()
    }
}
