//! Raw change signals reported by a notification source.

use std::path::PathBuf;

/// Classification of a raw change signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The watched content was created.
    Create,
    /// The watched content was written to.
    Write,
    /// The watched path was removed.
    Remove,
    /// The watched path was renamed.
    Rename,
    /// Permissions, timestamps or other metadata changed.
    Metadata,
    /// The watched path was opened, read or closed.
    Access,
    /// Anything the source could not classify.
    Other,
}

/// A single raw change signal.
///
/// Settlement never replays a signal's payload; the paths are only used for
/// change logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// What kind of change occurred.
    pub kind: SignalKind,
    /// Paths affected by the change, if the source reports them.
    pub paths: Vec<PathBuf>,
}

impl Signal {
    /// Create a signal with no associated paths.
    pub fn new(kind: SignalKind) -> Self {
        Self {
            kind,
            paths: Vec::new(),
        }
    }

    /// Attach a path to the signal.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Human-readable name for log lines.
    pub(crate) fn describe(&self) -> String {
        match self.paths.as_slice() {
            [] => "<unknown>".to_string(),
            [path] => path.display().to_string(),
            paths => paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(feature = "file-watch")]
impl From<notify::Event> for Signal {
    fn from(event: notify::Event) -> Self {
        use notify::EventKind;
        use notify::event::ModifyKind;

        let kind = match event.kind {
            EventKind::Create(_) => SignalKind::Create,
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other) => {
                SignalKind::Write
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => SignalKind::Metadata,
            EventKind::Modify(ModifyKind::Name(_)) => SignalKind::Rename,
            EventKind::Remove(_) => SignalKind::Remove,
            EventKind::Access(_) => SignalKind::Access,
            EventKind::Any | EventKind::Other => SignalKind::Other,
        };

        Self {
            kind,
            paths: event.paths,
        }
    }
}
