//! The change event delivered to consumers.

/// Configuration state before and after a settled change.
///
/// Events are produced once per settle cycle and never mutated afterwards.
/// No semantic diffing happens: `previous` and `current` may be equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<T> {
    previous: T,
    current: T,
}

impl<T> ChangeEvent<T> {
    pub(crate) fn new(previous: T, current: T) -> Self {
        Self { previous, current }
    }

    /// The configuration value delivered before this change (or the initial
    /// baseline).
    pub fn previous(&self) -> &T {
        &self.previous
    }

    /// The configuration value read when the change settled.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Take ownership of the newly read value.
    pub fn into_current(self) -> T {
        self.current
    }

    /// Split the event into `(previous, current)`.
    pub fn into_parts(self) -> (T, T) {
        (self.previous, self.current)
    }
}
