//! Observable events
//!
//! Events are explicit and typed. Each carries its own severity so callers
//! never pick a level ad hoc.

use std::fmt;

use super::Severity;

/// Observable events in a version graph's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Graph constructed with its root version
    GraphCreated,
    /// New version committed to the index
    VersionForked,
    /// Fork landed on a version that already had children
    BranchCreated,
    /// `current` repositioned without creating a version
    CurrentMoved,
    /// Operation failed validation; history untouched
    OperationRejected,
    /// History captured into a manifest
    ManifestExported,
    /// Graph rebuilt from a manifest
    ManifestImported,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::GraphCreated => "GRAPH_CREATED",
            Event::VersionForked => "VERSION_FORKED",
            Event::BranchCreated => "BRANCH_CREATED",
            Event::CurrentMoved => "CURRENT_MOVED",
            Event::OperationRejected => "OPERATION_REJECTED",
            Event::ManifestExported => "MANIFEST_EXPORTED",
            Event::ManifestImported => "MANIFEST_IMPORTED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::VersionForked | Event::CurrentMoved => Severity::Trace,
            Event::OperationRejected => Severity::Warn,
            Event::GraphCreated
            | Event::BranchCreated
            | Event::ManifestExported
            | Event::ManifestImported => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::GraphCreated,
            Event::VersionForked,
            Event::BranchCreated,
            Event::CurrentMoved,
            Event::OperationRejected,
            Event::ManifestExported,
            Event::ManifestImported,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejection_is_warn() {
        assert_eq!(Event::OperationRejected.severity(), Severity::Warn);
        assert_eq!(Event::VersionForked.severity(), Severity::Trace);
        assert_eq!(Event::BranchCreated.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::BranchCreated), "BRANCH_CREATED");
    }
}
