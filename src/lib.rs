//! forkline - Versioned containers with branching history
//!
//! Every mutating operation on a container produces a new version; no
//! version is ever changed or removed afterwards. Any earlier version can be
//! read directly, and repositioning `current` to it makes the next edit start
//! a sibling branch.
//!
//! ```
//! use forkline::{PersistentArray, Versioned, VersionId};
//!
//! let mut array = PersistentArray::from_vec(vec![1, 2, 3]);
//! let v1 = array.set(0, 10).unwrap();
//! assert_eq!(array.get_at(VersionId::ROOT, 0).unwrap(), &1);
//! assert_eq!(array.get_at(v1, 0).unwrap(), &10);
//!
//! array.set_version(VersionId::ROOT).unwrap();
//! let v2 = array.append(4).unwrap();
//! assert_eq!(array.version(v2).unwrap(), &vec![1, 2, 3, 4]);
//! ```
//!
//! Layout:
//! - `version` - ids, nodes and the `VersionGraph` engine
//! - `snapshot` - per-version content and the fork copy contract
//! - `containers` - array, map and linked list adapters
//! - `manifest` - checksummed export and import of whole histories

pub mod config;
pub mod containers;
pub mod error;
pub mod manifest;
pub mod observability;
pub mod snapshot;
pub mod version;

pub use config::ContainerConfig;
pub use containers::{PersistentArray, PersistentList, PersistentMap, Versioned};
pub use error::{ContainerError, ContainerResult, ErrorCode};
pub use manifest::{HistoryManifest, ManifestError, ManifestResult};
pub use snapshot::{Chain, Snapshot};
pub use version::{GraphId, VersionGraph, VersionId};
