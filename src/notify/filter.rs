//! Filtering of raw signals before debouncing.

use super::{Signal, SignalKind};

/// Returns true for signals that can change the watched content.
///
/// Only writes and creations pass. Metadata, access, rename and removal
/// signals are dropped so they never schedule a settle cycle.
pub fn is_relevant(signal: &Signal) -> bool {
    matches!(signal.kind, SignalKind::Write | SignalKind::Create)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_content_changes_pass() {
        let cases = [
            (SignalKind::Write, true),
            (SignalKind::Create, true),
            (SignalKind::Remove, false),
            (SignalKind::Rename, false),
            (SignalKind::Metadata, false),
            (SignalKind::Access, false),
            (SignalKind::Other, false),
        ];

        for (kind, expected) in cases {
            assert_eq!(is_relevant(&Signal::new(kind)), expected, "{kind:?}");
        }
    }
}
