//! VersionNode - One immutable point in a container's history
//!
//! - Owns its snapshot exclusively
//! - Records its parent and the versions forked directly from it
//! - The snapshot is never handed out mutably once the node is indexed
//!
//! Only the graph may add children; everything else is read-only.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::VersionId;

/// A single node of the version tree.
///
/// All fields are private. The snapshot is reachable through `snapshot()`
/// only, so history can not be edited after the fact.
#[derive(Clone, Debug)]
pub struct VersionNode<S> {
    /// Identity of this version.
    id: VersionId,
    /// Version this one was forked from. `None` only for the root.
    parent: Option<VersionId>,
    /// Versions forked directly from this one, in creation order.
    children: BTreeSet<VersionId>,
    /// Wall-clock time the node was registered. Metadata only.
    created_at: DateTime<Utc>,
    /// Full container content at this version.
    snapshot: S,
}

impl<S> VersionNode<S> {
    /// Creates the root node of a graph.
    pub fn root(snapshot: S) -> Self {
        Self {
            id: VersionId::ROOT,
            parent: None,
            children: BTreeSet::new(),
            created_at: Utc::now(),
            snapshot,
        }
    }

    /// Creates a node forked from `parent`.
    pub fn forked(id: VersionId, parent: VersionId, snapshot: S) -> Self {
        Self {
            id,
            parent: Some(parent),
            children: BTreeSet::new(),
            created_at: Utc::now(),
            snapshot,
        }
    }

    /// Reassembles a node from persisted parts.
    pub(crate) fn from_parts(
        id: VersionId,
        parent: Option<VersionId>,
        children: BTreeSet<VersionId>,
        created_at: DateTime<Utc>,
        snapshot: S,
    ) -> Self {
        Self {
            id,
            parent,
            children,
            created_at,
            snapshot,
        }
    }

    /// Returns the version identity.
    #[inline]
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// Returns the parent version, if any.
    #[inline]
    pub fn parent(&self) -> Option<VersionId> {
        self.parent
    }

    /// Returns the child versions in ascending id order.
    #[inline]
    pub fn children(&self) -> &BTreeSet<VersionId> {
        &self.children
    }

    /// Returns true if at least one version was forked from this one.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the registration timestamp.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the snapshot, read-only.
    #[inline]
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    pub(crate) fn add_child(&mut self, child: VersionId) {
        self.children.insert(child);
    }
}
