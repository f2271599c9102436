//! Container Adapter Tests
//!
//! End-to-end behaviour of the array, map and linked list adapters:
//! - Branching histories per container shape
//! - Typed error kinds on invalid edits
//! - Capacity limits
//! - Linked list cell isolation across versions

use std::collections::HashMap;

use forkline::observability::Severity;
use forkline::{
    ContainerConfig, ContainerError, ErrorCode, PersistentArray, PersistentList, PersistentMap,
    VersionId, Versioned,
};

// =============================================================================
// Array Tests
// =============================================================================

/// append, reposition to the root, append again: two sibling versions.
#[test]
fn test_array_sibling_branches() {
    let mut array = PersistentArray::filled(3, 0);

    let v1 = array.append(5).unwrap();
    array.set_version(VersionId::ROOT).unwrap();
    let v2 = array.append(9).unwrap();

    assert_eq!(v1, VersionId::new(1));
    assert_eq!(v2, VersionId::new(2));
    assert_eq!(array.version(VersionId::ROOT).unwrap(), &vec![0, 0, 0]);
    assert_eq!(array.version(v1).unwrap(), &vec![0, 0, 0, 5]);
    assert_eq!(array.version(v2).unwrap(), &vec![0, 0, 0, 9]);
    assert_eq!(array.graph().children(VersionId::ROOT).unwrap(), vec![v1, v2]);
}

/// Insert and remove respect their own bounds.
#[test]
fn test_array_bounds() {
    let mut array = PersistentArray::from_vec(vec!['a', 'b']);

    array.insert(2, 'c').unwrap();
    array.insert(0, 'z').unwrap();
    assert_eq!(array.as_slice(), &['z', 'a', 'b', 'c']);

    assert_eq!(
        array.insert(5, 'x').unwrap_err(),
        ContainerError::IndexOutOfRange { index: 5, len: 4 }
    );
    assert_eq!(
        array.remove_at(4).unwrap_err(),
        ContainerError::IndexOutOfRange { index: 4, len: 4 }
    );
    assert_eq!(array.remove_at(0).unwrap(), 'z');
    assert_eq!(array.version_count(), 4);
}

/// Capacity is checked before the index.
#[test]
fn test_array_capacity_before_index() {
    let mut array = PersistentArray::with_config(vec![1, 2], ContainerConfig::with_capacity(2));

    let err = array.insert(10, 3).unwrap_err();
    assert_eq!(err, ContainerError::CapacityExceeded { capacity: 2 });
    assert_eq!(err.code(), ErrorCode::CapacityExceeded);

    array.remove_at(0).unwrap();
    assert!(!array.is_full());
    array.append(3).unwrap();
    assert!(array.is_full());
}

/// An oversized initial version is kept, but cannot grow further.
#[test]
fn test_array_capacity_bounds_growth_only() {
    let mut array =
        PersistentArray::with_config(vec![1, 2, 3], ContainerConfig::with_capacity(2));

    assert_eq!(array.len(), 3);
    assert!(array.is_full());
    assert_eq!(
        array.append(4).unwrap_err(),
        ContainerError::CapacityExceeded { capacity: 2 }
    );

    array.set(0, 10).unwrap();
    array.remove_at(2).unwrap();
    assert_eq!(array.as_slice(), &[10, 2]);
    assert!(array.is_full());
    assert_eq!(array.version(VersionId::ROOT).unwrap(), &vec![1, 2, 3]);
}

// =============================================================================
// Map Tests
// =============================================================================

/// set then remove; the root keeps its original entries.
#[test]
fn test_map_history() {
    let mut map = PersistentMap::from_map(HashMap::from([("a", 1), ("b", 2)]));

    let v1 = map.set("c", 3).unwrap();
    assert_eq!(
        map.version(v1).unwrap(),
        &HashMap::from([("a", 1), ("b", 2), ("c", 3)])
    );

    assert_eq!(map.remove("a").unwrap(), 1);
    let v2 = map.current_version();
    assert_eq!(v2, VersionId::new(2));
    assert_eq!(map.version(v2).unwrap(), &HashMap::from([("b", 2), ("c", 3)]));
    assert_eq!(
        map.version(VersionId::ROOT).unwrap(),
        &HashMap::from([("a", 1), ("b", 2)])
    );
}

/// Missing keys are reported by kind.
#[test]
fn test_map_missing_key() {
    let mut map: PersistentMap<String, u8> = PersistentMap::new();

    let err = map.remove("ghost").unwrap_err();
    assert!(matches!(err, ContainerError::KeyNotFound { .. }));
    assert_eq!(err.code().as_str(), "FORK_KEY_NOT_FOUND");
    assert_eq!(map.version_count(), 1);
}

/// Config parsed from JSON drives capacity and logging.
#[test]
fn test_map_from_json_config() {
    let config = ContainerConfig::from_json(r#"{"capacity": 2, "log_level": "warn"}"#).unwrap();
    assert_eq!(config.log_level, Some(Severity::Warn));

    let mut map = PersistentMap::with_config(HashMap::new(), config);
    map.set(1, "one").unwrap();
    map.set(2, "two").unwrap();
    map.set(2, "deux").unwrap();

    assert_eq!(
        map.set(3, "three").unwrap_err(),
        ContainerError::CapacityExceeded { capacity: 2 }
    );
    assert_eq!(map.get(&2), Some(&"deux"));
    assert_eq!(map.graph().metrics().rejections, 1);
}

// =============================================================================
// Linked List Tests
// =============================================================================

/// Removing a middle cell in a new version leaves the old middle cell intact.
#[test]
fn test_list_old_middle_cell_survives_removal() {
    let mut list = PersistentList::from_vec(vec![1, 2, 3]);
    let before = list.current_version();

    assert_eq!(list.remove_at(1).unwrap(), 2);
    assert_eq!(list.to_vec(), vec![1, 3]);

    let old = list.version(before).unwrap();
    let middle = old.cell_at(1).unwrap();
    let view = old.view(middle).unwrap();
    assert_eq!(view.value, &2);

    let prev = old.view(view.prev.unwrap()).unwrap();
    let next = old.view(view.next.unwrap()).unwrap();
    assert_eq!(prev.value, &1);
    assert_eq!(next.value, &3);
    assert_eq!(prev.next, Some(middle));
    assert_eq!(next.prev, Some(middle));
    assert_eq!(old.to_vec(), vec![1, 2, 3]);
}

/// Branches on a list rebuild links independently.
#[test]
fn test_list_branches() {
    let mut list = PersistentList::from_vec(vec!["a", "b"]);
    let v1 = list.add_last("c").unwrap();
    list.set_version(VersionId::ROOT).unwrap();
    let v2 = list.add_first("z").unwrap();

    assert_eq!(list.version(v1).unwrap().to_vec(), vec!["a", "b", "c"]);
    assert_eq!(list.version(v2).unwrap().to_vec(), vec!["z", "a", "b"]);
    assert_eq!(format!("{}", list), "z->a->b");
    assert_eq!(list.get_at(v1, 2).unwrap(), &"c");
}

/// Empty and missing value errors are distinct.
#[test]
fn test_list_errors() {
    let mut list: PersistentList<i32> = PersistentList::new();
    assert_eq!(list.remove_at(3).unwrap_err(), ContainerError::EmptyContainer);

    list.add_last(7).unwrap();
    assert!(matches!(
        list.remove_by_value(&8).unwrap_err(),
        ContainerError::ValueNotFound { .. }
    ));
    assert!(matches!(
        list.get_at(VersionId::new(9), 0).unwrap_err(),
        ContainerError::VersionNotFound { .. }
    ));
    assert_eq!(list.version_count(), 2);
}

/// Long lists copy without recursion.
#[test]
fn test_list_long_chain_fork() {
    let mut list = PersistentList::from_vec((0..100_000).collect());
    list.remove_at(50_000).unwrap();

    assert_eq!(list.len(), 99_999);
    assert_eq!(list.get(50_000).unwrap(), &50_001);
    assert_eq!(list.get_at(VersionId::ROOT, 50_000).unwrap(), &50_000);
}
