//! Starting and supervising watch sessions.

use super::debounce::{PendingTx, Settler, pending_slot};
use super::{ChangeStream, NotificationSource, SourceStreams, filter};
use crate::core::WatchOptions;
use crate::core::lifecycle::Lifecycle;
use crate::error::{Result, WatchError};
use crate::sources::{ConfigReader, read_isolated};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "file-watch")]
use super::FsSource;
#[cfg(feature = "file-watch")]
use std::path::Path;

/// Watch a configuration file and stream settled changes.
///
/// The reader is called once up front to establish the initial baseline, then
/// once per settled burst of writes. Each emitted [`ChangeEvent`] pairs the
/// previously delivered value with the newly read one.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if:
/// - The path cannot be watched ([`WatchError::SourceUnavailable`])
/// - The initial read fails or panics ([`WatchError::InitialRead`])
/// - No tokio runtime is available ([`WatchError::NoRuntime`])
///
/// Errors after startup go to the configured error handler and never end
/// the session.
///
/// # Examples
///
/// ```rust,no_run
/// use config_watcher::prelude::*;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<()> {
/// let cancel = CancellationToken::new();
/// let path = "config/app.yaml";
///
/// let mut changes = watch(
///     cancel.clone(),
///     path,
///     move || std::fs::read_to_string(path),
///     WatchOptions::new().with_debounce(Duration::from_millis(100)),
/// )?;
///
/// while let Some(change) = changes.recv().await {
///     println!("{:?} -> {:?}", change.previous(), change.current());
/// }
/// # Ok(())
/// # }
/// ```
///
/// [`ChangeEvent`]: crate::core::ChangeEvent
#[cfg(feature = "file-watch")]
pub fn watch<T, R>(
    cancel: CancellationToken,
    path: impl AsRef<Path>,
    reader: R,
    options: WatchOptions,
) -> Result<ChangeStream<T>>
where
    T: Clone + Send + 'static,
    R: ConfigReader<T>,
{
    let (source, streams) = FsSource::open(path)?;
    watch_source(cancel, source, streams, reader, options)
}

/// Start a watch session on an already opened notification source.
///
/// On error the source is released before returning.
///
/// # Errors
///
/// Returns [`WatchError::InitialRead`] if the initial read fails or panics,
/// and [`WatchError::NoRuntime`] outside of a tokio runtime.
pub fn watch_source<T, R, S>(
    cancel: CancellationToken,
    mut source: S,
    streams: SourceStreams,
    reader: R,
    options: WatchOptions,
) -> Result<ChangeStream<T>>
where
    T: Clone + Send + 'static,
    R: ConfigReader<T>,
    S: NotificationSource,
{
    let Ok(runtime) = Handle::try_current() else {
        source.release();
        return Err(WatchError::NoRuntime);
    };

    let initial = match read_isolated(&reader) {
        Ok(value) => value,
        Err(err) => {
            source.release();
            return Err(WatchError::InitialRead(Box::new(err)));
        }
    };

    let options = Arc::new(options);
    let session = cancel.child_token();
    let lifecycle = Lifecycle::new();
    let (output_tx, output_rx) = mpsc::channel(1);
    let (pending_tx, pending_rx) = pending_slot();

    let settler = Settler::new(
        Arc::new(reader),
        initial.clone(),
        output_tx,
        Arc::clone(&options),
        session.clone(),
    );

    runtime.spawn({
        let session = session.clone();
        let lifecycle = lifecycle.clone();
        async move {
            let settle_task = tokio::spawn(settler.run(pending_rx));

            drain(streams, pending_tx, &session, &options).await;
            lifecycle.begin_shutdown();
            session.cancel();
            source.release();

            let settler = match settle_task.await {
                Ok(settler) => Some(settler),
                Err(err) => {
                    tracing::error!(error = %err, "Settle task terminated abnormally");
                    None
                }
            };

            lifecycle.close();
            // Dropping the settler drops the last output sender.
            drop(settler);
            tracing::debug!("Watch session closed");
        }
    });

    Ok(ChangeStream::new(output_rx, initial, session, lifecycle))
}

/// Drain raw signals and source errors until cancellation or until the signal
/// sequence ends.
async fn drain(
    mut streams: SourceStreams,
    pending: PendingTx,
    session: &CancellationToken,
    options: &WatchOptions,
) {
    let mut errors_open = true;

    loop {
        tokio::select! {
            biased;

            _ = session.cancelled() => {
                options.log(format_args!("Watcher stopped by cancellation"));
                break;
            }

            signal = streams.signals.recv() => match signal {
                Some(signal) if filter::is_relevant(&signal) => {
                    tracing::trace!(kind = ?signal.kind, "Accepted change signal");
                    pending.send_replace(Some(signal));
                }
                Some(signal) => {
                    tracing::trace!(kind = ?signal.kind, "Ignored change signal");
                }
                None => {
                    tracing::warn!("Notification source ended its signal stream");
                    break;
                }
            },

            err = streams.errors.recv(), if errors_open => match err {
                Some(err) => options.report(err),
                None => errors_open = false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{ManualSource, SignalKind};
    use std::io;
    use std::time::Duration;

    #[test]
    fn test_watch_source_outside_runtime() {
        let (feed, source, streams) = ManualSource::open();
        let result = watch_source(
            CancellationToken::new(),
            source,
            streams,
            || Ok::<_, io::Error>(1u32),
            WatchOptions::new(),
        );

        assert!(matches!(result, Err(WatchError::NoRuntime)));
        assert!(feed.is_released());
    }

    #[tokio::test]
    async fn test_initial_read_failure_releases_source() {
        let (feed, source, streams) = ManualSource::open();
        let result = watch_source(
            CancellationToken::new(),
            source,
            streams,
            || -> std::result::Result<u32, io::Error> { panic!("first read explodes") },
            WatchOptions::new(),
        );

        match result {
            Err(WatchError::InitialRead(inner)) => {
                assert!(matches!(*inner, WatchError::ReaderPanicked(_)))
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert!(feed.is_released());
    }

    #[tokio::test]
    async fn test_ignored_signals_do_not_settle() {
        let (feed, source, streams) = ManualSource::open();
        let mut changes = watch_source(
            CancellationToken::new(),
            source,
            streams,
            || Ok::<_, io::Error>("same".to_string()),
            WatchOptions::new().with_debounce(Duration::ZERO),
        )
        .unwrap();

        feed.signal(SignalKind::Metadata);
        feed.signal(SignalKind::Remove);
        feed.signal(SignalKind::Access);

        let next = tokio::time::timeout(Duration::from_millis(200), changes.recv()).await;
        assert!(next.is_err(), "no event expected for ignored signals");
    }

    #[cfg(feature = "file-watch")]
    #[tokio::test]
    async fn test_watch_nonexistent_path() {
        let result = watch(
            CancellationToken::new(),
            "/invalid/path",
            || Ok::<_, io::Error>(String::new()),
            WatchOptions::new(),
        );
        assert!(matches!(result, Err(WatchError::SourceUnavailable { .. })));
    }
}
