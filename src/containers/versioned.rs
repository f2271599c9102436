//! Versioned - Shared contract of every container adapter
//!
//! An adapter owns a `VersionGraph` and a `ContainerConfig` and nothing else;
//! all history lives in the graph. Every mutating operation goes through
//! `commit`:
//!
//! 1. validate against the current snapshot (no side effect on failure)
//! 2. fork the current version
//! 3. apply the edit to the fresh copy
//!
//! Reads, repositioning and lineage are provided here once for all shapes.

use serde::Serialize;

use crate::config::ContainerConfig;
use crate::error::{ContainerError, ContainerResult};
use crate::manifest::{HistoryManifest, ManifestResult};
use crate::snapshot::Snapshot;
use crate::version::{VersionGraph, VersionId};

/// A container whose every edit produces a new, independently readable version.
pub trait Versioned {
    /// Concrete content stored per version.
    type Snapshot: Snapshot;

    /// The version graph holding this container's history.
    fn graph(&self) -> &VersionGraph<Self::Snapshot>;

    /// Mutable access to the graph; only `commit` and repositioning use it.
    fn graph_mut(&mut self) -> &mut VersionGraph<Self::Snapshot>;

    /// Configuration the container was built with.
    fn config(&self) -> &ContainerConfig;

    /// Validate against the current snapshot, then fork and apply `mutate`.
    ///
    /// Whatever `validate` returns is handed to `mutate`, so anything looked
    /// up during validation does not have to be looked up again. A failed
    /// validation is recorded as a rejection and creates no version.
    fn commit<P, R>(
        &mut self,
        validate: impl FnOnce(&Self::Snapshot, &ContainerConfig) -> ContainerResult<P>,
        mutate: impl FnOnce(&mut Self::Snapshot, P) -> R,
    ) -> ContainerResult<(VersionId, R)> {
        let checked = validate(self.graph().current_snapshot(), self.config());
        match checked {
            Ok(prepared) => Ok(self
                .graph_mut()
                .fork_and_mutate(|snapshot| mutate(snapshot, prepared))),
            Err(err) => Err(self.graph().reject(err)),
        }
    }

    /// Version the next edit derives from.
    fn current_version(&self) -> VersionId {
        self.graph().current()
    }

    /// Most recently created version.
    fn latest_version(&self) -> VersionId {
        self.graph().latest()
    }

    /// Number of versions ever created, root included.
    fn version_count(&self) -> usize {
        self.graph().version_count()
    }

    /// Reposition `current`; the next edit branches from `version`.
    fn set_version(&mut self, version: VersionId) -> ContainerResult<()> {
        self.graph_mut().set_current(version)
    }

    /// Whole snapshot at `version`.
    fn version(&self, version: VersionId) -> ContainerResult<&Self::Snapshot> {
        self.graph().get(version)
    }

    /// Whole snapshot at the current version.
    fn current_snapshot(&self) -> &Self::Snapshot {
        self.graph().current_snapshot()
    }

    /// Element count of the current version.
    fn len(&self) -> usize {
        self.current_snapshot().element_count()
    }

    /// Returns true if the current version holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the current version has reached the capacity.
    fn is_full(&self) -> bool {
        self.config().is_full(self.len())
    }

    /// Capture the whole history as a checksummed manifest.
    fn history_manifest(&self) -> ManifestResult<HistoryManifest<Self::Snapshot>>
    where
        Self::Snapshot: Clone + Serialize,
    {
        HistoryManifest::capture(self.graph())
    }
}

/// Fails with `CapacityExceeded` when one more element would not fit.
pub(crate) fn ensure_room(config: &ContainerConfig, len: usize) -> ContainerResult<()> {
    match config.capacity {
        Some(capacity) if len >= capacity => Err(ContainerError::CapacityExceeded { capacity }),
        _ => Ok(()),
    }
}

/// Fails with `IndexOutOfRange` unless `index < len`.
pub(crate) fn ensure_index(index: usize, len: usize) -> ContainerResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(ContainerError::IndexOutOfRange { index, len })
    }
}

/// Fails with `IndexOutOfRange` unless `index <= len`.
pub(crate) fn ensure_position(index: usize, len: usize) -> ContainerResult<()> {
    if index <= len {
        Ok(())
    } else {
        Err(ContainerError::IndexOutOfRange { index, len })
    }
}
