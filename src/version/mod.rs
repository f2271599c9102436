//! Version Domain Types
//!
//! This module provides:
//! - `VersionId` - Totally ordered version identity
//! - `IdAllocator` - Strictly monotonic id assignment
//! - `VersionNode` - One immutable point in history
//! - `VersionGraph` - Flat-indexed version tree with a `current` pointer

mod graph;
mod id_allocator;
mod node;
mod version_id;

pub use graph::{GraphId, VersionGraph};
pub use id_allocator::{IdAllocator, IdAllocatorError};
pub use node::VersionNode;
pub use version_id::VersionId;
