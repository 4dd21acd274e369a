//! Notification sources feeding the watcher.

use super::Signal;
use crate::error::{BoxError, WatchError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

#[cfg(feature = "file-watch")]
use crate::error::Result;
#[cfg(feature = "file-watch")]
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
#[cfg(feature = "file-watch")]
use std::path::{Path, PathBuf};

/// The live signal and error sequences of an opened source.
///
/// When the signal sequence ends the watch session shuts down. An ended error
/// sequence is simply no longer polled.
#[derive(Debug)]
pub struct SourceStreams {
    /// Raw change signals, in arrival order.
    pub signals: mpsc::UnboundedReceiver<Signal>,
    /// Errors reported by the source while running.
    pub errors: mpsc::UnboundedReceiver<WatchError>,
}

/// Owner of the system resource behind a [`SourceStreams`] pair.
pub trait NotificationSource: Send + 'static {
    /// Release the underlying resource.
    ///
    /// Must be idempotent and must not block indefinitely.
    fn release(&mut self);
}

/// File system notification source backed by `notify`.
///
/// # Examples
///
/// ```rust,no_run
/// use config_watcher::notify::{FsSource, NotificationSource};
///
/// # fn example() -> config_watcher::error::Result<()> {
/// let (mut source, mut streams) = FsSource::open("/etc/app/config.yaml")?;
/// while let Some(signal) = streams.signals.blocking_recv() {
///     println!("{:?} on {:?}", signal.kind, signal.paths);
/// }
/// source.release();
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "file-watch")]
pub struct FsSource {
    watcher: Option<RecommendedWatcher>,
    path: PathBuf,
}

#[cfg(feature = "file-watch")]
impl FsSource {
    /// Start watching `path` (non-recursively).
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::SourceUnavailable`] if the watcher cannot be
    /// created or the path cannot be watched (e.g., it doesn't exist).
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, SourceStreams)> {
        let path = path.as_ref().to_path_buf();
        let (signal_tx, signals) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receivers go away on shutdown; late events are dropped.
            match res {
                Ok(event) => {
                    let _ = signal_tx.send(Signal::from(event));
                }
                Err(err) => {
                    let _ = error_tx.send(WatchError::Source(Box::new(err)));
                }
            }
        })
        .map_err(|e| WatchError::unavailable(&path, e))?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::unavailable(&path, e))?;

        tracing::debug!(path = %path.display(), "Opened file system notification source");

        Ok((
            Self {
                watcher: Some(watcher),
                path,
            },
            SourceStreams { signals, errors },
        ))
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the underlying watcher is still held.
    pub fn is_open(&self) -> bool {
        self.watcher.is_some()
    }
}

#[cfg(feature = "file-watch")]
impl NotificationSource for FsSource {
    fn release(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(err) = watcher.unwatch(&self.path) {
                tracing::trace!(error = %err, "Unwatch failed during release");
            }
            drop(watcher);
            tracing::debug!(path = %self.path.display(), "Released file system notification source");
        }
    }
}

#[cfg(feature = "file-watch")]
impl Drop for FsSource {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(feature = "file-watch")]
impl std::fmt::Debug for FsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsSource")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Source driven by hand through a [`ManualFeed`].
///
/// Useful for embedding notification mechanisms the crate does not know about,
/// and for exercising the debounce engine deterministically.
///
/// # Examples
///
/// ```rust
/// use config_watcher::notify::{ManualSource, SignalKind};
///
/// let (feed, _source, mut streams) = ManualSource::open();
/// assert!(feed.signal(SignalKind::Write));
/// assert_eq!(streams.signals.try_recv().unwrap().kind, SignalKind::Write);
/// ```
#[derive(Debug)]
pub struct ManualSource {
    released: Arc<AtomicBool>,
}

impl ManualSource {
    /// Open a source, returning its feed handle and streams.
    pub fn open() -> (ManualFeed, ManualSource, SourceStreams) {
        let (signal_tx, signals) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        let released = Arc::new(AtomicBool::new(false));

        (
            ManualFeed {
                signals: Some(signal_tx),
                errors: Some(error_tx),
                released: Arc::clone(&released),
            },
            ManualSource { released },
            SourceStreams { signals, errors },
        )
    }
}

impl NotificationSource for ManualSource {
    fn release(&mut self) {
        self.released.store(true, Ordering::Release);
    }
}

/// Handle used to push signals and errors into a [`ManualSource`].
#[derive(Debug)]
pub struct ManualFeed {
    signals: Option<mpsc::UnboundedSender<Signal>>,
    errors: Option<mpsc::UnboundedSender<WatchError>>,
    released: Arc<AtomicBool>,
}

impl ManualFeed {
    /// Push a signal with no paths. Returns false once the feed is closed or
    /// the session stopped reading.
    pub fn signal(&self, kind: super::SignalKind) -> bool {
        self.send(Signal::new(kind))
    }

    /// Push a fully formed signal.
    pub fn send(&self, signal: Signal) -> bool {
        self.signals
            .as_ref()
            .is_some_and(|tx| tx.send(signal).is_ok())
    }

    /// Push a source-level error.
    pub fn error(&self, err: impl Into<BoxError>) -> bool {
        self.errors
            .as_ref()
            .is_some_and(|tx| tx.send(WatchError::Source(err.into())).is_ok())
    }

    /// Whether the session released the source.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// End both sequences, as a source whose underlying mechanism died would.
    pub fn close(&mut self) {
        self.signals = None;
        self.errors = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SignalKind;

    #[test]
    fn test_manual_source_release_is_idempotent() {
        let (feed, mut source, _streams) = ManualSource::open();
        assert!(!feed.is_released());

        source.release();
        source.release();
        assert!(feed.is_released());
    }

    #[test]
    fn test_manual_feed_close_ends_streams() {
        let (mut feed, _source, mut streams) = ManualSource::open();
        feed.signal(SignalKind::Create);
        feed.error("inotify queue overflow");
        feed.close();

        assert_eq!(streams.signals.blocking_recv().map(|s| s.kind), Some(SignalKind::Create));
        assert!(streams.signals.blocking_recv().is_none());
        assert!(matches!(streams.errors.blocking_recv(), Some(WatchError::Source(_))));
        assert!(streams.errors.blocking_recv().is_none());
        assert!(!feed.signal(SignalKind::Write));
    }

    #[cfg(feature = "file-watch")]
    #[test]
    fn test_fs_source_nonexistent_path() {
        let err = FsSource::open("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, WatchError::SourceUnavailable { .. }));
    }

    #[cfg(feature = "file-watch")]
    #[test]
    fn test_fs_source_release_is_idempotent() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let (mut source, _streams) = FsSource::open(temp_file.path()).unwrap();
        assert!(source.is_open());

        source.release();
        source.release();
        assert!(!source.is_open());
    }
}
