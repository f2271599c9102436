//! Snapshot - Full container content at one version
//!
//! A snapshot owns all of its storage. Forking a version deep-copies the
//! current snapshot through `Snapshot::fork_copy`; the copy must never share
//! mutable storage with its source, otherwise editing the new version would
//! leak into history.
//!
//! Provided shapes:
//! - `Vec<T>` - flat sequence (array adapter)
//! - `HashMap<K, V>` - key/value mapping (map adapter)
//! - `Chain<T>` - doubly-linked cells (list adapter)

pub mod chain;

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

pub use chain::{CellId, CellView, Chain};

/// Content that can be duplicated into an independent copy for a new version.
pub trait Snapshot: Sized {
    /// Returns a deep copy that shares no mutable storage with `self`.
    fn fork_copy(&self) -> Self;

    /// Number of elements held, used for capacity checks and copy metrics.
    fn element_count(&self) -> usize;
}

impl<T: Clone> Snapshot for Vec<T> {
    fn fork_copy(&self) -> Self {
        self.clone()
    }

    fn element_count(&self) -> usize {
        self.len()
    }
}

impl<K, V, H> Snapshot for HashMap<K, V, H>
where
    K: Clone + Eq + Hash,
    V: Clone,
    H: BuildHasher + Clone,
{
    fn fork_copy(&self) -> Self {
        self.clone()
    }

    fn element_count(&self) -> usize {
        self.len()
    }
}
