//! Session lifecycle tracking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// State of a watch session.
///
/// Transitions only move forward: `Active → ShuttingDown → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Signals are being drained and changes delivered.
    Active,
    /// Cancellation was observed or the source stream ended; work is unwinding.
    ShuttingDown,
    /// The source is released and the output stream is closed.
    Closed,
}

const ACTIVE: u8 = 0;
const SHUTTING_DOWN: u8 = 1;
const CLOSED: u8 = 2;

/// Shared, one-directional state cell for a session.
#[derive(Debug, Clone)]
pub(crate) struct Lifecycle {
    state: Arc<AtomicU8>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ACTIVE)),
        }
    }

    /// Move from `Active` to `ShuttingDown`. Returns false if shutdown had
    /// already begun.
    pub(crate) fn begin_shutdown(&self) -> bool {
        self.state
            .compare_exchange(ACTIVE, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn close(&self) {
        self.state.store(CLOSED, Ordering::Release);
    }

    pub(crate) fn state(&self) -> SessionState {
        match self.state.load(Ordering::Acquire) {
            ACTIVE => SessionState::Active,
            SHUTTING_DOWN => SessionState::ShuttingDown,
            _ => SessionState::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_one_directional() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), SessionState::Active);

        assert!(lifecycle.begin_shutdown());
        assert!(!lifecycle.begin_shutdown());
        assert_eq!(lifecycle.state(), SessionState::ShuttingDown);

        lifecycle.close();
        assert!(!lifecycle.begin_shutdown());
        assert_eq!(lifecycle.state(), SessionState::Closed);
    }

    #[test]
    fn test_clones_share_state() {
        let lifecycle = Lifecycle::new();
        let observer = lifecycle.clone();
        lifecycle.begin_shutdown();
        assert_eq!(observer.state(), SessionState::ShuttingDown);
    }
}
