//! PersistentMap - Versioned key/value mapping
//!
//! Keys are unique; insertion order is irrelevant. Overwriting an existing
//! key does not count against the capacity, adding a new key does.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::config::ContainerConfig;
use crate::error::{ContainerError, ContainerResult};
use crate::manifest::{HistoryManifest, ManifestResult};
use crate::version::{VersionGraph, VersionId};

use super::versioned::{ensure_room, Versioned};

/// A versioned map backed by one `HashMap` per version.
#[derive(Debug)]
pub struct PersistentMap<K, V> {
    graph: VersionGraph<HashMap<K, V>>,
    config: ContainerConfig,
}

impl<K, V> PersistentMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Empty, unbounded map.
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    /// Version 0 holds `entries`.
    pub fn from_map(entries: HashMap<K, V>) -> Self {
        Self::with_config(entries, ContainerConfig::default())
    }

    /// Version 0 holds `entries`; edits obey `config`.
    ///
    /// The capacity bounds growth only. Version 0 is taken as given even
    /// when it already exceeds the capacity; every growing edit on it fails.
    pub fn with_config(entries: HashMap<K, V>, config: ContainerConfig) -> Self {
        Self {
            graph: VersionGraph::with_logger(entries, config.logger()),
            config,
        }
    }

    /// Value for `key` in the current version, if present.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current_snapshot().get(key)
    }

    /// Value for `key` in `version`.
    pub fn get_at<Q>(&self, version: VersionId, key: &Q) -> ContainerResult<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.graph
            .get(version)?
            .get(key)
            .ok_or_else(|| ContainerError::key_not_found(&key))
    }

    /// Returns true if the current version holds `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current_snapshot().contains_key(key)
    }

    /// Insert or overwrite `key` in a new version.
    pub fn set(&mut self, key: K, value: V) -> ContainerResult<VersionId> {
        let overwrite = self.current_snapshot().contains_key(&key);
        self.commit(
            |s, config| {
                if overwrite {
                    Ok(())
                } else {
                    ensure_room(config, s.len())
                }
            },
            |s, ()| {
                s.insert(key, value);
            },
        )
        .map(|(version, ())| version)
    }

    /// Remove `key` in a new version and return its value.
    ///
    /// An absent key fails with `KeyNotFound` and creates no version.
    pub fn remove<Q>(&mut self, key: &Q) -> ContainerResult<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.commit(
            |s, _| {
                s.get(key)
                    .cloned()
                    .ok_or_else(|| ContainerError::key_not_found(&key))
            },
            |s, value| {
                s.remove(key);
                value
            },
        )
        .map(|(_, value)| value)
    }

    /// Drop every entry in a new version.
    pub fn clear(&mut self) -> ContainerResult<VersionId> {
        self.commit(|_, _| Ok(()), |s, ()| s.clear())
            .map(|(version, ())| version)
    }

    /// Keys of the current version, unordered.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.current_snapshot().keys()
    }
}

impl<K, V> PersistentMap<K, V>
where
    K: Clone + Eq + Hash + Serialize,
    V: Clone + Serialize,
{
    /// Rebuild a map from a previously captured history.
    pub fn restore(
        manifest: HistoryManifest<HashMap<K, V>>,
        config: ContainerConfig,
    ) -> ManifestResult<Self> {
        Ok(Self {
            graph: manifest.restore(config.logger())?,
            config,
        })
    }
}

impl<K, V> Versioned for PersistentMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    type Snapshot = HashMap<K, V>;

    fn graph(&self) -> &VersionGraph<HashMap<K, V>> {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut VersionGraph<HashMap<K, V>> {
        &mut self.graph
    }

    fn config(&self) -> &ContainerConfig {
        &self.config
    }
}

impl<K, V> Default for PersistentMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
