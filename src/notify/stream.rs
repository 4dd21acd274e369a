//! Consumer side of a watch session.

use crate::core::{ChangeEvent, SessionState};
use crate::core::lifecycle::Lifecycle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Stream of settled configuration changes.
///
/// The stream ends (`recv` returns `None`) once the session is over, either
/// because it was cancelled or because the notification source stopped.
/// Dropping the stream ends the session.
///
/// The stream buffers at most one event. An event handed off before
/// [`stop`](Self::stop) or cancellation has already advanced the session's
/// baseline, so it is still returned by `recv` ahead of the final `None`.
#[derive(Debug)]
pub struct ChangeStream<T> {
    events: mpsc::Receiver<ChangeEvent<T>>,
    initial: T,
    session: CancellationToken,
    lifecycle: Lifecycle,
}

impl<T> ChangeStream<T> {
    pub(crate) fn new(
        events: mpsc::Receiver<ChangeEvent<T>>,
        initial: T,
        session: CancellationToken,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            events,
            initial,
            session,
            lifecycle,
        }
    }

    /// Wait for the next change. Returns `None` once the session has ended.
    pub async fn recv(&mut self) -> Option<ChangeEvent<T>> {
        self.events.recv().await
    }

    /// The baseline read when the session started.
    pub fn initial(&self) -> &T {
        &self.initial
    }

    /// Current lifecycle state of the session.
    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub(crate) fn session(&self) -> &CancellationToken {
        &self.session
    }

    /// End the session without cancelling the caller's token.
    ///
    /// An event already buffered in the stream can still be received.
    pub fn stop(&self) {
        self.session.cancel();
    }
}

impl<T> Drop for ChangeStream<T> {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
