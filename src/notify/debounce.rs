//! Debounce timer and settle-and-emit actor.
//!
//! A single task owns the countdown timer and the baseline value. Accepted
//! signals reach it through a single-slot overwrite buffer, so the producer
//! never blocks and only the latest pending signal survives. Settle cycles run
//! inside the task, which serializes them without a shared lock.

use super::Signal;
use crate::core::{ChangeEvent, WatchOptions};
use crate::error::WatchError;
use crate::sources::{ConfigReader, read_isolated};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Sending half of the pending-signal slot.
pub(crate) type PendingTx = watch::Sender<Option<Signal>>;
/// Receiving half of the pending-signal slot.
pub(crate) type PendingRx = watch::Receiver<Option<Signal>>;

pub(crate) fn pending_slot() -> (PendingTx, PendingRx) {
    watch::channel(None)
}

/// What the actor should do after a settle cycle.
#[derive(Debug, PartialEq, Eq)]
enum Settled {
    Continue,
    Stop,
}

/// Owns the baseline and turns elapsed countdowns into change events.
pub(crate) struct Settler<T, R> {
    reader: Arc<R>,
    baseline: T,
    output: mpsc::Sender<ChangeEvent<T>>,
    options: Arc<WatchOptions>,
    session: CancellationToken,
}

impl<T, R> Settler<T, R>
where
    T: Clone + Send + 'static,
    R: ConfigReader<T>,
{
    pub(crate) fn new(
        reader: Arc<R>,
        baseline: T,
        output: mpsc::Sender<ChangeEvent<T>>,
        options: Arc<WatchOptions>,
        session: CancellationToken,
    ) -> Self {
        Self {
            reader,
            baseline,
            output,
            options,
            session,
        }
    }

    /// Run until the session is cancelled or the pending slot closes.
    ///
    /// Returns the settler so the caller decides when the output channel
    /// closes.
    pub(crate) async fn run(mut self, mut pending: PendingRx) -> Self {
        let debounce = self.options.debounce();
        let timer = sleep(debounce);
        tokio::pin!(timer);
        let mut armed = false;
        let mut trigger: Option<Signal> = None;

        loop {
            tokio::select! {
                biased;

                _ = self.session.cancelled() => {
                    tracing::trace!("Debounce loop observed cancellation");
                    break;
                }

                changed = pending.changed() => {
                    if changed.is_err() {
                        tracing::trace!("Pending slot closed");
                        break;
                    }
                    trigger = pending.borrow_and_update().clone();
                    // Rearm: at most one live countdown.
                    timer.as_mut().reset(Instant::now() + debounce);
                    armed = true;
                }

                _ = &mut timer, if armed => {
                    armed = false;
                    if self.settle(trigger.take()).await == Settled::Stop {
                        break;
                    }
                }
            }
        }

        self
    }

    /// One settle cycle: read, then emit and advance the baseline unless the
    /// session ended in the meantime.
    async fn settle(&mut self, trigger: Option<Signal>) -> Settled {
        let reader = Arc::clone(&self.reader);
        let read = tokio::task::spawn_blocking(move || read_isolated(reader.as_ref()));

        // An in-flight read is never preempted; on cancellation its result is
        // discarded once it returns.
        let outcome = tokio::select! {
            biased;
            _ = self.session.cancelled() => return Settled::Stop,
            joined = read => joined,
        };

        let current = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "Settle cycle failed, baseline unchanged");
                self.options.report(err);
                return Settled::Continue;
            }
            Err(join_err) => {
                // Panics are caught inside the blocking task; this is the
                // runtime refusing or cancelling the read.
                self.options.report(WatchError::Reader(Box::new(join_err)));
                return Settled::Continue;
            }
        };

        let event = ChangeEvent::new(self.baseline.clone(), current.clone());
        tokio::select! {
            biased;
            _ = self.session.cancelled() => return Settled::Stop,
            sent = self.output.send(event) => {
                if sent.is_err() {
                    tracing::debug!("Change stream dropped by consumer, stopping session");
                    self.session.cancel();
                    return Settled::Stop;
                }
            }
        }

        self.baseline = current;

        if self.options.logs_changes() {
            let name = trigger
                .as_ref()
                .map(Signal::describe)
                .unwrap_or_else(|| "<unknown>".to_string());
            self.options.log(format_args!("File changed: {}", name));
        }

        Settled::Continue
    }
}
