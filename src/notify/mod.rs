//! Change detection: notification sources, filtering, debouncing and the
//! watch session that ties them together.

mod debounce;
pub mod filter;
mod signal;
mod source;
mod stream;
mod watcher;

pub use signal::{Signal, SignalKind};
pub use source::{ManualFeed, ManualSource, NotificationSource, SourceStreams};
pub use stream::ChangeStream;
pub use watcher::watch_source;

#[cfg(feature = "file-watch")]
pub use source::FsSource;
#[cfg(feature = "file-watch")]
pub use watcher::watch;
