//! Boundary traits for testability
//!
//! Column ids are the only non-deterministic input of the editor. They come
//! from an `IdGenerator` so services can be tested with predictable ids.

use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

/// Source of fresh column ids.
pub trait IdGenerator: Send + Sync {
    /// Produce a new id. Uniqueness against the current forest is checked by
    /// the caller.
    fn next_id(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Random ids: the first `len` hex digits of a v4 uuid.
#[derive(Debug)]
pub struct RandomIdGenerator {
    len: usize,
}

impl RandomIdGenerator {
    pub fn new(len: usize) -> Self {
        // a simple uuid has 32 hex digits
        Self {
            len: len.clamp(4, 32),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(13)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(self.len);
        id
    }
}

/// Predictable ids `<prefix>-1`, `<prefix>-2`, ...
///
/// Used for scripted sessions, where later lines refer to columns created by
/// earlier ones.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicUsize,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicUsize::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("col")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_random_generator_when_generating_then_ids_have_requested_length() {
        let ids = RandomIdGenerator::new(13);
        let id = ids.next_id();
        assert_eq!(id.len(), 13);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn given_random_generator_when_generating_many_then_ids_differ() {
        let ids = RandomIdGenerator::default();
        let seen: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn given_sequential_generator_when_generating_then_counts_up() {
        let ids = SequentialIdGenerator::default();
        assert_eq!(ids.next_id(), "col-1");
        assert_eq!(ids.next_id(), "col-2");
    }
}
