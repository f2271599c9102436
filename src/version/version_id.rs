//! VersionId - Totally ordered version identity
//!
//! - Non-negative, strictly increasing within one graph
//! - Never reused, even when a branch is abandoned
//! - `0` always names the initial version
//!
//! This is a PURE TYPE with NO behavior beyond construction and access.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A totally ordered version identity, unique per `VersionGraph`.
///
/// Ordering reflects creation order only. Two ids being adjacent says
/// nothing about lineage; use the graph's lineage queries for that.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(u64);

impl VersionId {
    /// The initial version every graph starts with.
    pub const ROOT: VersionId = VersionId(0);

    /// Creates a new VersionId with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if this is the initial version.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for VersionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_zero() {
        assert_eq!(VersionId::ROOT.value(), 0);
        assert!(VersionId::ROOT.is_root());
        assert!(!VersionId::new(1).is_root());
    }

    #[test]
    fn test_version_id_is_copy() {
        let id1 = VersionId::new(7);
        let id2 = id1;
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_version_id_ordering_follows_value() {
        assert!(VersionId::new(1) < VersionId::new(2));
        assert!(VersionId::ROOT < VersionId::new(1));
    }

    #[test]
    fn test_version_id_display() {
        assert_eq!(format!("{}", VersionId::new(12)), "v12");
    }

    #[test]
    fn test_version_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&VersionId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: VersionId = serde_json::from_str("3").unwrap();
        assert_eq!(back, VersionId::new(3));
    }
}
