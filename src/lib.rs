//! # config-watcher
//!
//! Debounced configuration file watching with before/after change events.
//!
//! ## Overview
//!
//! `config-watcher` turns the noisy stream of file system notifications for a
//! configuration file into one [`ChangeEvent`](core::ChangeEvent) per settled
//! edit:
//! - Only writes and creations are considered
//! - Bursts of signals collapse into a single re-read after a quiet period
//! - Each event pairs the previously delivered value with the newly read one
//! - Reader errors and panics are reported and never end the session
//! - Cancellation closes the stream promptly, even with a change pending
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use config_watcher::prelude::*;
//! use serde::Deserialize;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug, Deserialize, Clone)]
//! struct AppConfig {
//!     port: u16,
//! }
//!
//! # async fn example() -> config_watcher::error::Result<()> {
//! let cancel = CancellationToken::new();
//!
//! let mut changes = watch(
//!     cancel.clone(),
//!     "config/app.yaml",
//!     FileReader::<AppConfig>::new("config/app.yaml"),
//!     WatchOptions::new()
//!         .with_debounce(Duration::from_millis(100))
//!         .with_error_handler(|err| eprintln!("config error: {err}")),
//! )?;
//!
//! while let Some(change) = changes.recv().await {
//!     println!("port {} -> {}", change.previous().port, change.current().port);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `file-watch` (default): file system notifications through `notify`
//! - `validation` (default): the [`Validate`](core::Validate) trait
//! - `template` (default): YAML template rendering

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;
pub mod sources;

#[cfg(feature = "template")]
pub mod template;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        ChangeEvent, LiveConfig, Logger, NoopLogger, SessionState, TracingLogger, WatchOptions,
    };
    pub use crate::error::{Result, ValidationError, WatchError};
    pub use crate::notify::{ChangeStream, watch_source};
    pub use crate::sources::{ConfigReader, FileReader};

    #[cfg(feature = "file-watch")]
    pub use crate::notify::watch;

    #[cfg(feature = "validation")]
    pub use crate::core::Validate;
}
