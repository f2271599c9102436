//! PersistentList - Versioned doubly-linked list
//!
//! Each version owns a separate `Chain`. Forking rebuilds every cell, so
//! unlinking a cell in a new version never disturbs the neighbours seen by
//! an older one.
//!
//! Validation before forking:
//! - removal from an empty list fails with `EmptyContainer`
//! - a bad index fails with `IndexOutOfRange`
//! - removing an absent value fails with `ValueNotFound`

use std::fmt;

use serde::Serialize;

use crate::config::ContainerConfig;
use crate::error::{ContainerError, ContainerResult};
use crate::manifest::{HistoryManifest, ManifestResult};
use crate::snapshot::chain::{Chain, Iter};
use crate::version::{VersionGraph, VersionId};

use super::versioned::{ensure_index, ensure_position, ensure_room, Versioned};

/// A versioned doubly-linked list.
#[derive(Debug)]
pub struct PersistentList<T> {
    graph: VersionGraph<Chain<T>>,
    config: ContainerConfig,
}

impl<T: Clone> PersistentList<T> {
    /// Empty, unbounded list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Version 0 links `values` in order.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::with_config(values, ContainerConfig::default())
    }

    /// Version 0 links `values` in order; edits obey `config`.
    ///
    /// The capacity bounds growth only. Version 0 is taken as given even
    /// when it already exceeds the capacity; every growing edit on it fails.
    pub fn with_config(values: Vec<T>, config: ContainerConfig) -> Self {
        Self {
            graph: VersionGraph::with_logger(Chain::from(values), config.logger()),
            config,
        }
    }

    /// Value at `index` in the current version.
    pub fn get(&self, index: usize) -> ContainerResult<&T> {
        Self::value_at(self.current_snapshot(), index)
    }

    /// Value at `index` in `version`.
    pub fn get_at(&self, version: VersionId, index: usize) -> ContainerResult<&T> {
        Self::value_at(self.graph.get(version)?, index)
    }

    /// Append at the tail in a new version.
    pub fn add_last(&mut self, value: T) -> ContainerResult<VersionId> {
        self.commit(
            |s, config| ensure_room(config, s.len()),
            |s, ()| s.push_back(value),
        )
        .map(|(version, ())| version)
    }

    /// Prepend at the head in a new version.
    pub fn add_first(&mut self, value: T) -> ContainerResult<VersionId> {
        self.commit(
            |s, config| ensure_room(config, s.len()),
            |s, ()| s.push_front(value),
        )
        .map(|(version, ())| version)
    }

    /// Insert so that `value` ends up at `index`; `index == len` appends.
    pub fn insert_at(&mut self, index: usize, value: T) -> ContainerResult<VersionId> {
        self.commit(
            |s, config| {
                ensure_room(config, s.len())?;
                ensure_position(index, s.len())
            },
            |s, ()| {
                s.insert(index, value);
            },
        )
        .map(|(version, ())| version)
    }

    /// Unlink the cell at `index` in a new version and return its value.
    pub fn remove_at(&mut self, index: usize) -> ContainerResult<T> {
        self.commit(
            |s, _| {
                if s.is_empty() {
                    return Err(ContainerError::EmptyContainer);
                }
                Self::value_at(s, index).cloned()
            },
            |s, value| {
                s.remove(index);
                value
            },
        )
        .map(|(_, value)| value)
    }

    /// Unlink the first cell equal to `value` in a new version.
    pub fn remove_by_value(&mut self, value: &T) -> ContainerResult<VersionId>
    where
        T: PartialEq + fmt::Debug,
    {
        self.commit(
            |s, _| {
                if s.is_empty() {
                    return Err(ContainerError::EmptyContainer);
                }
                s.position(value)
                    .ok_or_else(|| ContainerError::value_not_found(value))
            },
            |s, index| {
                s.remove(index);
            },
        )
        .map(|(version, ())| version)
    }

    /// Replace the value at `index` in a new version.
    pub fn set(&mut self, index: usize, value: T) -> ContainerResult<VersionId> {
        self.commit(
            |s, _| ensure_index(index, s.len()),
            |s, ()| {
                s.replace(index, value);
            },
        )
        .map(|(version, ())| version)
    }

    /// Unlink every cell in a new version.
    pub fn clear(&mut self) -> ContainerResult<VersionId> {
        self.commit(|_, _| Ok(()), |s, ()| s.clear())
            .map(|(version, ())| version)
    }

    /// Iterate the current version head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        self.current_snapshot().iter()
    }

    /// Current version collected head first.
    pub fn to_vec(&self) -> Vec<T> {
        self.current_snapshot().to_vec()
    }

    fn value_at(chain: &Chain<T>, index: usize) -> ContainerResult<&T> {
        chain.get(index).ok_or(ContainerError::IndexOutOfRange {
            index,
            len: chain.len(),
        })
    }
}

impl<T: Clone + Serialize> PersistentList<T> {
    /// Rebuild a list from a previously captured history.
    pub fn restore(
        manifest: HistoryManifest<Chain<T>>,
        config: ContainerConfig,
    ) -> ManifestResult<Self> {
        Ok(Self {
            graph: manifest.restore(config.logger())?,
            config,
        })
    }
}

impl<T: Clone> Versioned for PersistentList<T> {
    type Snapshot = Chain<T>;

    fn graph(&self) -> &VersionGraph<Chain<T>> {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut VersionGraph<Chain<T>> {
        &mut self.graph
    }

    fn config(&self) -> &ContainerConfig {
        &self.config
    }
}

impl<T: Clone> Default for PersistentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Display> fmt::Display for PersistentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> PersistentList<i32> {
        PersistentList::from_vec(vec![1, 2, 3, 4])
    }

    #[test]
    fn test_initial_state() {
        let l = list();
        assert_eq!(l.len(), 4);
        assert_eq!(l.get_at(VersionId::ROOT, 0).unwrap(), &1);
        assert_eq!(format!("{}", l), "1->2->3->4");
    }

    #[test]
    fn test_add_last_and_first() {
        let mut l = list();
        l.add_last(5).unwrap();
        l.add_first(0).unwrap();

        assert_eq!(l.to_vec(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(l.version_count(), 3);
    }

    #[test]
    fn test_insert_at() {
        let mut l = list();
        l.insert_at(2, 99).unwrap();
        assert_eq!(l.get(2).unwrap(), &99);
        assert_eq!(l.get(3).unwrap(), &3);

        l.insert_at(0, -1).unwrap();
        l.insert_at(6, 100).unwrap();
        assert_eq!(l.to_vec(), vec![-1, 1, 2, 99, 3, 4, 100]);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut l = list();
        assert_eq!(
            l.insert_at(10, 100).unwrap_err(),
            ContainerError::IndexOutOfRange { index: 10, len: 4 }
        );
        assert_eq!(l.version_count(), 1);
    }

    #[test]
    fn test_remove_at() {
        let mut l = list();
        assert_eq!(l.remove_at(1).unwrap(), 2);
        assert_eq!(l.len(), 3);
        assert_eq!(l.to_vec(), vec![1, 3, 4]);
        assert!(l.remove_at(3).is_err());
    }

    #[test]
    fn test_remove_from_empty() {
        let mut l: PersistentList<i32> = PersistentList::new();
        assert_eq!(l.remove_at(0).unwrap_err(), ContainerError::EmptyContainer);
        assert_eq!(
            l.remove_by_value(&1).unwrap_err(),
            ContainerError::EmptyContainer
        );
        assert_eq!(l.version_count(), 1);
    }

    #[test]
    fn test_remove_by_value() {
        let mut l = list();
        l.remove_by_value(&3).unwrap();
        assert_eq!(l.to_vec(), vec![1, 2, 4]);

        assert_eq!(
            l.remove_by_value(&10).unwrap_err(),
            ContainerError::ValueNotFound {
                value: "10".to_string()
            }
        );
        assert_eq!(l.version_count(), 2);
    }

    #[test]
    fn test_set() {
        let mut l = list();
        l.set(0, 10).unwrap();
        assert_eq!(l.get(0).unwrap(), &10);
        assert_eq!(l.get_at(VersionId::ROOT, 0).unwrap(), &1);
        assert!(l.set(4, 0).is_err());
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut l = list();
        let v1 = l.clear().unwrap();
        assert!(l.is_empty());
        assert_eq!(format!("{}", l), "");
        assert_eq!(l.version(v1).unwrap().len(), 0);
        assert_eq!(l.version(VersionId::ROOT).unwrap().len(), 4);
    }

    #[test]
    fn test_capacity() {
        let mut l = PersistentList::with_config(vec![1], ContainerConfig::with_capacity(1));
        assert!(l.is_full());
        assert_eq!(
            l.add_first(0).unwrap_err(),
            ContainerError::CapacityExceeded { capacity: 1 }
        );
        assert!(l.add_last(2).is_err());
        assert!(l.insert_at(0, 2).is_err());
        assert_eq!(l.version_count(), 1);
    }

    #[test]
    fn test_iter() {
        let l = list();
        let doubled: Vec<i32> = l.iter().map(|v| v * 2).collect();
        assert_eq!(doubled, vec![2, 4, 6, 8]);
    }
}
