//! Core types shared by watch sessions and their consumers.

mod event;
pub(crate) mod lifecycle;
mod live;
mod options;

#[cfg(feature = "validation")]
mod validation;

pub use event::ChangeEvent;
pub use lifecycle::SessionState;
pub use live::LiveConfig;
pub use options::{DEFAULT_DEBOUNCE, ErrorHandler, Logger, NoopLogger, TracingLogger, WatchOptions};

#[cfg(feature = "validation")]
pub use validation::Validate;
