//! IdAllocator - Monotonic version identity assignment
//!
//! - Identities are assigned exactly once
//! - Assignment is strictly +1 per successful fork
//! - A failed operation never consumes an identity
//!
//! The graph asks for an id only once the new snapshot is ready to be
//! indexed, so an operation that bails out earlier leaves `next_id` untouched.

use thiserror::Error;

use super::VersionId;

/// Monotonic source of version identities for one graph.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// The id the next successful fork will receive.
    next_id: u64,
}

impl IdAllocator {
    /// Create an allocator for a fresh graph.
    ///
    /// The root version (0) is considered assigned, so the first fork gets 1.
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// The identity the next fork will receive.
    pub fn peek(&self) -> VersionId {
        VersionId::new(self.next_id)
    }

    /// Hand out the next identity and advance past it.
    pub fn assign_next(&mut self) -> VersionId {
        let id = VersionId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Consume `id`, which must be exactly the next identity.
    ///
    /// Used when replaying a persisted history, where ids arrive from
    /// outside and must be checked rather than trusted.
    pub fn mark_assigned(&mut self, id: VersionId) -> Result<(), IdAllocatorError> {
        if id.value() != self.next_id {
            return Err(IdAllocatorError::OutOfOrder {
                attempted: id.value(),
                expected: self.next_id,
            });
        }
        self.next_id += 1;
        Ok(())
    }

    /// Highest identity assigned so far (the root when no fork happened).
    pub fn latest(&self) -> VersionId {
        VersionId::new(self.next_id - 1)
    }

    /// Raw value of the next identity.
    pub fn next_value(&self) -> u64 {
        self.next_id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from identity assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdAllocatorError {
    /// Attempted to consume an identity other than the next one.
    #[error("Out of order version identity: attempted {attempted} but expected {expected}")]
    OutOfOrder { attempted: u64, expected: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allocator_starts_after_root() {
        let allocator = IdAllocator::new();
        assert_eq!(allocator.peek(), VersionId::new(1));
        assert_eq!(allocator.latest(), VersionId::ROOT);
    }

    #[test]
    fn test_mark_assigned_advances_by_one() {
        let mut allocator = IdAllocator::new();
        let next = allocator.peek();
        allocator.mark_assigned(next).unwrap();

        assert_eq!(allocator.latest(), VersionId::new(1));
        assert_eq!(allocator.peek(), VersionId::new(2));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let allocator = IdAllocator::new();
        assert_eq!(allocator.peek(), allocator.peek());
        assert_eq!(allocator.next_value(), 1);
    }

    #[test]
    fn test_out_of_order_assignment_fails() {
        let mut allocator = IdAllocator::new();
        let result = allocator.mark_assigned(VersionId::new(5));
        assert!(matches!(result, Err(IdAllocatorError::OutOfOrder { .. })));
        assert_eq!(allocator.next_value(), 1);
    }

    #[test]
    fn test_duplicate_assignment_fails() {
        let mut allocator = IdAllocator::new();
        allocator.mark_assigned(VersionId::new(1)).unwrap();
        let result = allocator.mark_assigned(VersionId::new(1));
        assert!(matches!(result, Err(IdAllocatorError::OutOfOrder { .. })));
    }

    #[test]
    fn test_assign_next_is_strictly_increasing() {
        let mut allocator = IdAllocator::new();
        let a = allocator.assign_next();
        let b = allocator.assign_next();
        assert_eq!(a, VersionId::new(1));
        assert_eq!(b, VersionId::new(2));
        assert_eq!(allocator.latest(), b);
    }

    #[test]
    fn test_replay_sequence() {
        let mut allocator = IdAllocator::new();
        for id in 1..=5 {
            allocator.mark_assigned(VersionId::new(id)).unwrap();
        }
        assert_eq!(allocator.peek(), VersionId::new(6));
    }
}
