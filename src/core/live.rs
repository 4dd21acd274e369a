//! Lock-free handle following a change stream.

use crate::error::{Result, WatchError};
use crate::notify::ChangeStream;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// The newest configuration delivered by a [`ChangeStream`], readable without
/// locks.
///
/// A background task applies every event's `current` value with an atomic
/// swap. Readers never block the follower or each other.
///
/// # Examples
///
/// ```rust,no_run
/// use config_watcher::prelude::*;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<()> {
/// let path = "config/app.yaml";
/// let changes = watch(
///     CancellationToken::new(),
///     path,
///     move || std::fs::read_to_string(path),
///     WatchOptions::new(),
/// )?;
///
/// let config = LiveConfig::follow(changes)?;
/// println!("current: {}", config.get());
/// # Ok(())
/// # }
/// ```
pub struct LiveConfig<T> {
    current: Arc<ArcSwap<T>>,
    version: Arc<AtomicU64>,
    following: Arc<AtomicBool>,
    session: Arc<SessionGuard>,
}

impl<T> LiveConfig<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start following `stream`, beginning from its initial baseline.
    ///
    /// The session ends when the last clone of the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::NoRuntime`] outside of a tokio runtime. The
    /// stream is dropped, which ends its session.
    pub fn follow(mut stream: ChangeStream<T>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| WatchError::NoRuntime)?;

        let current = Arc::new(ArcSwap::from_pointee(stream.initial().clone()));
        let version = Arc::new(AtomicU64::new(0));
        let following = Arc::new(AtomicBool::new(true));
        let session = Arc::new(SessionGuard(stream.session().clone()));

        runtime.spawn({
            let current = Arc::clone(&current);
            let version = Arc::clone(&version);
            let following = Arc::clone(&following);
            async move {
                while let Some(event) = stream.recv().await {
                    current.store(Arc::new(event.into_current()));
                    version.fetch_add(1, Ordering::AcqRel);
                }
                following.store(false, Ordering::Release);
                tracing::debug!("Change stream ended, live config frozen");
            }
        });

        Ok(Self {
            current,
            version,
            following,
            session,
        })
    }
}

impl<T> LiveConfig<T> {
    /// Get a reference-counted handle to the newest configuration.
    pub fn get(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Number of changes applied since following started.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Whether the underlying stream is still open.
    pub fn is_following(&self) -> bool {
        self.following.load(Ordering::Acquire)
    }

    /// End the watch session for every clone. The last applied value stays
    /// readable.
    pub fn stop(&self) {
        self.session.0.cancel();
    }
}

/// Cancels the followed session once the last handle is gone.
struct SessionGuard(CancellationToken);

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl<T> Clone for LiveConfig<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            version: Arc::clone(&self.version),
            following: Arc::clone(&self.following),
            session: Arc::clone(&self.session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WatchOptions;
    use crate::notify::{ManualSource, SignalKind, watch_source};
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_follow_applies_changes() {
        let value = Arc::new(Mutex::new(8080u16));
        let source_value = Arc::clone(&value);
        let (mut feed, source, streams) = ManualSource::open();

        let changes = watch_source(
            CancellationToken::new(),
            source,
            streams,
            move || Ok::<_, io::Error>(*source_value.lock().unwrap()),
            WatchOptions::new().with_debounce(Duration::from_millis(5)),
        )
        .unwrap();

        let config = LiveConfig::follow(changes).unwrap();
        assert_eq!(*config.get(), 8080);
        assert_eq!(config.version(), 0);

        *value.lock().unwrap() = 9090;
        feed.signal(SignalKind::Write);

        for _ in 0..100 {
            if config.version() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(config.version(), 1);
        assert_eq!(*config.get(), 9090);

        feed.close();
        for _ in 0..100 {
            if !config.is_following() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!config.is_following());
        assert_eq!(*config.get(), 9090);
    }

    #[tokio::test]
    async fn test_dropping_last_handle_ends_session() {
        let (feed, source, streams) = ManualSource::open();
        let cancel = CancellationToken::new();
        let changes = watch_source(
            cancel.clone(),
            source,
            streams,
            || Ok::<_, io::Error>(1u32),
            WatchOptions::new(),
        )
        .unwrap();

        let config = LiveConfig::follow(changes).unwrap();
        let reader = config.clone();
        drop(config);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!feed.is_released(), "a live clone keeps the session open");

        drop(reader);
        for _ in 0..100 {
            if feed.is_released() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(feed.is_released());
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_stop_freezes_last_value() {
        let (feed, source, streams) = ManualSource::open();
        let changes = watch_source(
            CancellationToken::new(),
            source,
            streams,
            || Ok::<_, io::Error>(7u32),
            WatchOptions::new(),
        )
        .unwrap();

        let config = LiveConfig::follow(changes).unwrap();
        config.stop();

        for _ in 0..100 {
            if !config.is_following() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!config.is_following());
        assert!(feed.is_released());
        assert_eq!(*config.get(), 7);
    }

    #[test]
    fn test_follow_outside_runtime() {
        let (_events_tx, events) = tokio::sync::mpsc::channel(1);
        let session = CancellationToken::new();
        let stream = ChangeStream::new(
            events,
            1u32,
            session.clone(),
            crate::core::lifecycle::Lifecycle::new(),
        );

        let result = LiveConfig::follow(stream);
        assert!(matches!(result, Err(WatchError::NoRuntime)));
        assert!(session.is_cancelled());
    }
}
