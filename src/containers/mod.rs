//! Container adapters
//!
//! Each adapter translates domain edits into "validate, fork, mutate the copy"
//! against its own `VersionGraph`:
//! - `PersistentArray` - index-addressable sequence
//! - `PersistentMap` - key/value mapping
//! - `PersistentList` - doubly-linked list

mod array;
mod list;
mod map;
mod versioned;

pub use array::PersistentArray;
pub use list::PersistentList;
pub use map::PersistentMap;
pub use versioned::Versioned;
