//! VersionGraph - The versioning engine
//!
//! Invariants:
//! - The index holds every version ever created; nothing is removed
//! - Ids grow by exactly 1 per successful fork and are never reused
//! - `current` always names an indexed version
//! - A fork deep-copies `current`, so no later edit is visible through
//!   the parent or through any sibling
//! - Every parent lists each of its forks as a child
//!
//! Ids are dense (0, 1, 2, ...), so the flat index is a vector addressed by
//! id. Lookup is O(1) whatever the shape of the branch tree.
//!
//! Branching is implicit: `set_current(v)` followed by a fork adds a new
//! child under `v` even when `v` already has one. The earlier child stays
//! reachable as an abandoned sibling branch.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{IdAllocator, VersionId, VersionNode};
use crate::error::{ContainerError, ContainerResult};
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot};
use crate::snapshot::Snapshot;

/// Identity of one graph instance. Version ids are only unique within it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(Uuid);

impl GraphId {
    /// Fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying uuid
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only tree of container versions with a movable `current` pointer.
#[derive(Debug)]
pub struct VersionGraph<S> {
    graph_id: GraphId,
    /// Flat index: position `i` holds version `i`.
    nodes: Vec<VersionNode<S>>,
    current: VersionId,
    ids: IdAllocator,
    logger: Logger,
    metrics: MetricsRegistry,
}

impl<S> VersionGraph<S> {
    /// Creates a graph whose root version holds `initial`.
    pub fn new(initial: S) -> Self {
        Self::with_logger(initial, Logger::disabled())
    }

    /// Creates a graph that reports through `logger`.
    pub fn with_logger(initial: S, logger: Logger) -> Self {
        let graph = Self {
            graph_id: GraphId::generate(),
            nodes: vec![VersionNode::root(initial)],
            current: VersionId::ROOT,
            ids: IdAllocator::new(),
            logger,
            metrics: MetricsRegistry::new(),
        };
        let graph_id = graph.graph_id.to_string();
        graph
            .logger
            .event(Event::GraphCreated, &[("graph_id", graph_id.as_str())]);
        graph
    }

    /// Reassembles a graph from already validated parts.
    pub(crate) fn from_parts(
        graph_id: GraphId,
        nodes: Vec<VersionNode<S>>,
        current: VersionId,
        ids: IdAllocator,
        logger: Logger,
    ) -> Self {
        Self {
            graph_id,
            nodes,
            current,
            ids,
            logger,
            metrics: MetricsRegistry::new(),
        }
    }

    /// Returns the graph identity
    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    /// Returns the root version (always 0)
    pub fn root(&self) -> VersionId {
        VersionId::ROOT
    }

    /// Returns the version the next fork will derive from
    pub fn current(&self) -> VersionId {
        self.current
    }

    /// Returns the id the next fork will receive
    pub fn next_id(&self) -> VersionId {
        self.ids.peek()
    }

    /// Returns the most recently created version
    pub fn latest(&self) -> VersionId {
        self.ids.latest()
    }

    /// Number of versions ever created, root included
    pub fn version_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if `version` exists in this graph
    pub fn contains(&self, version: VersionId) -> bool {
        self.slot(version).is_some()
    }

    /// Returns the node stored at `version`.
    pub fn node(&self, version: VersionId) -> ContainerResult<&VersionNode<S>> {
        self.slot(version)
            .and_then(|slot| self.nodes.get(slot))
            .ok_or(ContainerError::VersionNotFound { version })
    }

    /// Returns the snapshot stored at `version`, read-only.
    pub fn get(&self, version: VersionId) -> ContainerResult<&S> {
        self.node(version).map(VersionNode::snapshot)
    }

    /// Returns the snapshot of the current version.
    pub fn current_snapshot(&self) -> &S {
        self.current_node().snapshot()
    }

    /// Moves `current` to `version` without creating a version.
    ///
    /// The next fork becomes a child of `version`, which starts a sibling
    /// branch if `version` already has children.
    pub fn set_current(&mut self, version: VersionId) -> ContainerResult<()> {
        if !self.contains(version) {
            return Err(self.reject(ContainerError::VersionNotFound { version }));
        }

        let from = self.current.to_string();
        let to = version.to_string();
        self.current = version;
        self.metrics.increment_repositions();
        self.logger
            .event(Event::CurrentMoved, &[("from", from.as_str()), ("to", to.as_str())]);
        Ok(())
    }

    /// Derives a new version from `current`.
    ///
    /// Copies the current snapshot, applies `mutate` to the private copy,
    /// then registers the copy as a child of `current` and makes it current.
    /// All validation must happen before this call: once `mutate` runs the
    /// version is committed.
    pub fn fork_and_mutate<R>(&mut self, mutate: impl FnOnce(&mut S) -> R) -> (VersionId, R)
    where
        S: Snapshot,
    {
        let parent = self.current;
        let mut snapshot = self.current_node().snapshot().fork_copy();
        let copied = snapshot.element_count();
        let result = mutate(&mut snapshot);

        let id = self.ids.assign_next();
        let parent_node = &mut self.nodes[Self::slot_of(parent)];
        let branching = parent_node.has_children();
        parent_node.add_child(id);
        self.nodes.push(VersionNode::forked(id, parent, snapshot));
        self.current = id;

        self.metrics.record_fork(copied);
        let parent_str = parent.to_string();
        let id_str = id.to_string();
        let fields = [("parent", parent_str.as_str()), ("version", id_str.as_str())];
        self.logger.event(Event::VersionForked, &fields);
        if branching {
            self.metrics.increment_branches();
            self.logger.event(Event::BranchCreated, &fields);
        }

        (id, result)
    }

    /// Records a failed validation and hands the error back.
    ///
    /// Touches counters and logs only; history is left as it was.
    pub fn reject(&self, error: ContainerError) -> ContainerError {
        self.metrics.increment_rejections();
        if self.logger.enabled(error.code().severity()) {
            let current = self.current.to_string();
            let message = error.to_string();
            self.logger.log(
                error.code().severity(),
                Event::OperationRejected.as_str(),
                &[
                    ("code", error.code().as_str()),
                    ("current", current.as_str()),
                    ("message", message.as_str()),
                ],
            );
        }
        error
    }

    // Lineage

    /// Parent of `version`; `None` for the root.
    pub fn parent(&self, version: VersionId) -> ContainerResult<Option<VersionId>> {
        self.node(version).map(VersionNode::parent)
    }

    /// Versions forked directly from `version`, ascending.
    pub fn children(&self, version: VersionId) -> ContainerResult<Vec<VersionId>> {
        self.node(version)
            .map(|node| node.children().iter().copied().collect())
    }

    /// Path from `version` up to the root, nearest first, `version` excluded.
    pub fn ancestors(&self, version: VersionId) -> ContainerResult<Vec<VersionId>> {
        let mut path = Vec::new();
        let mut cursor = self.node(version)?.parent();
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.node(id)?.parent();
        }
        Ok(path)
    }

    /// Number of forks between the root and `version`.
    pub fn depth(&self, version: VersionId) -> ContainerResult<usize> {
        self.ancestors(version).map(|path| path.len())
    }

    /// Returns true if `ancestor` lies strictly above `version`.
    pub fn is_ancestor(&self, ancestor: VersionId, version: VersionId) -> ContainerResult<bool> {
        self.node(ancestor)?;
        // Parents always carry smaller ids, so the walk can stop early.
        let mut cursor = self.node(version)?.parent();
        while let Some(id) = cursor {
            if id == ancestor {
                return Ok(true);
            }
            if id < ancestor {
                return Ok(false);
            }
            cursor = self.node(id)?.parent();
        }
        Ok(false)
    }

    /// Versions without children: the tips of every branch, ascending.
    pub fn leaves(&self) -> Vec<VersionId> {
        self.nodes
            .iter()
            .filter(|node| !node.has_children())
            .map(VersionNode::id)
            .collect()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &VersionNode<S>> {
        self.nodes.iter()
    }

    /// Counter values for this graph
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Logger this graph reports through
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    fn current_node(&self) -> &VersionNode<S> {
        &self.nodes[Self::slot_of(self.current)]
    }

    fn slot(&self, version: VersionId) -> Option<usize> {
        let slot = usize::try_from(version.value()).ok()?;
        (slot < self.nodes.len()).then_some(slot)
    }

    fn slot_of(version: VersionId) -> usize {
        version.value() as usize
    }
}
