//! PersistentArray - Versioned, index-addressable sequence
//!
//! Bounds:
//! - `append` / `insert` accept `0 <= index <= len`
//! - `get` / `set` / `remove_at` require `index < len`
//!
//! A violated bound fails with `IndexOutOfRange` and creates no version.

use serde::Serialize;

use crate::config::ContainerConfig;
use crate::error::ContainerResult;
use crate::manifest::{HistoryManifest, ManifestResult};
use crate::version::{VersionGraph, VersionId};

use super::versioned::{ensure_index, ensure_position, ensure_room, Versioned};

/// A versioned array backed by one `Vec<T>` per version.
#[derive(Debug)]
pub struct PersistentArray<T> {
    graph: VersionGraph<Vec<T>>,
    config: ContainerConfig,
}

impl<T: Clone> PersistentArray<T> {
    /// Empty, unbounded array.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Version 0 holds `values`.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::with_config(values, ContainerConfig::default())
    }

    /// Version 0 holds `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self::from_vec(vec![value; len])
    }

    /// Version 0 holds `values`; edits obey `config`.
    ///
    /// The capacity bounds growth only. Version 0 is taken as given even
    /// when it already exceeds the capacity; every growing edit on it fails.
    pub fn with_config(values: Vec<T>, config: ContainerConfig) -> Self {
        Self {
            graph: VersionGraph::with_logger(values, config.logger()),
            config,
        }
    }

    /// Element at `index` in the current version.
    pub fn get(&self, index: usize) -> ContainerResult<&T> {
        Self::element(self.current_snapshot(), index)
    }

    /// Element at `index` in `version`.
    pub fn get_at(&self, version: VersionId, index: usize) -> ContainerResult<&T> {
        Self::element(self.graph.get(version)?, index)
    }

    /// Current version as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.current_snapshot()
    }

    /// Replace the element at `index` in a new version.
    pub fn set(&mut self, index: usize, value: T) -> ContainerResult<VersionId> {
        self.commit(
            |s, _| ensure_index(index, s.len()),
            |s, ()| s[index] = value,
        )
        .map(|(version, ())| version)
    }

    /// Push `value` at the end in a new version.
    pub fn append(&mut self, value: T) -> ContainerResult<VersionId> {
        self.commit(|s, config| ensure_room(config, s.len()), |s, ()| s.push(value))
            .map(|(version, ())| version)
    }

    /// Insert `value` at `index`, shifting later elements, in a new version.
    pub fn insert(&mut self, index: usize, value: T) -> ContainerResult<VersionId> {
        self.commit(
            |s, config| {
                ensure_room(config, s.len())?;
                ensure_position(index, s.len())
            },
            |s, ()| s.insert(index, value),
        )
        .map(|(version, ())| version)
    }

    /// Remove and return the element at `index` in a new version.
    pub fn remove_at(&mut self, index: usize) -> ContainerResult<T> {
        self.commit(|s, _| ensure_index(index, s.len()), |s, ()| s.remove(index))
            .map(|(_, removed)| removed)
    }

    fn element(values: &[T], index: usize) -> ContainerResult<&T> {
        ensure_index(index, values.len())?;
        Ok(&values[index])
    }
}

impl<T: Clone + Serialize> PersistentArray<T> {
    /// Rebuild an array from a previously captured history.
    pub fn restore(
        manifest: HistoryManifest<Vec<T>>,
        config: ContainerConfig,
    ) -> ManifestResult<Self> {
        Ok(Self {
            graph: manifest.restore(config.logger())?,
            config,
        })
    }
}

impl<T: Clone> Versioned for PersistentArray<T> {
    type Snapshot = Vec<T>;

    fn graph(&self) -> &VersionGraph<Vec<T>> {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut VersionGraph<Vec<T>> {
        &mut self.graph
    }

    fn config(&self) -> &ContainerConfig {
        &self.config
    }
}

impl<T: Clone> Default for PersistentArray<T> {
    fn default() -> Self {
        Self::new()
    }
}
