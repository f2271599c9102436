//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Owned by one graph, reset only when the graph is created
//! - Thread-safe but lock-free
//!
//! Counters describe activity, not history. A rejected operation bumps
//! `rejections` even though it creates no version.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Operational counters for one version graph
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Versions committed by forking
    forks: AtomicU64,
    /// Forks whose parent already had a child
    branches: AtomicU64,
    /// `set_current` calls
    repositions: AtomicU64,
    /// Operations rejected by validation
    rejections: AtomicU64,
    /// Elements duplicated while forking
    elements_copied: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fork that duplicated `elements` elements
    pub fn record_fork(&self, elements: usize) {
        self.forks.fetch_add(1, Ordering::Relaxed);
        self.elements_copied
            .fetch_add(elements as u64, Ordering::Relaxed);
    }

    /// Increment branches
    pub fn increment_branches(&self) {
        self.branches.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment repositions
    pub fn increment_repositions(&self) {
        self.repositions.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejections
    pub fn increment_rejections(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Get rejection count
    pub fn rejections(&self) -> u64 {
        self.rejections.load(Ordering::Relaxed)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            forks: self.forks.load(Ordering::Relaxed),
            branches: self.branches.load(Ordering::Relaxed),
            repositions: self.repositions.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            elements_copied: self.elements_copied.load(Ordering::Relaxed),
        }
    }

    /// Get all metrics as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| String::from("{}"))
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub forks: u64,
    pub branches: u64,
    pub repositions: u64,
    pub rejections: u64,
    pub elements_copied: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_fork_counts_elements() {
        let registry = MetricsRegistry::new();
        registry.record_fork(3);
        registry.record_fork(4);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.forks, 2);
        assert_eq!(snapshot.elements_copied, 7);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();
        registry.increment_branches();
        registry.increment_repositions();
        registry.increment_repositions();
        registry.increment_rejections();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.branches, 1);
        assert_eq!(snapshot.repositions, 2);
        assert_eq!(snapshot.rejections, 1);
        assert_eq!(registry.rejections(), 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.record_fork(10);

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["forks"], 1);
        assert_eq!(parsed["elements_copied"], 10);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_rejections();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.rejections(), 800);
    }
}
