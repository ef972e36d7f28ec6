//! Identifier generation for new records.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Produces a fresh unique string id on every call.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, hyphenated lowercase.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `prefix-000001`, `prefix-000002`, ...; zero padded so key order matches creation order.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: AtomicU64::new(1) }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n:06}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_are_unique_and_non_empty() {
        let ids = (0..100).map(|_| UuidGenerator.next_id()).collect::<Vec<_>>();
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert_eq!(ids.len(), ids.iter().collect::<HashSet<_>>().len());
    }

    #[test]
    fn sequential_ids_sort_in_creation_order() {
        let ids_gen = SequentialIds::new("rec");
        let ids = (0..12).map(|_| ids_gen.next_id()).collect::<Vec<_>>();
        assert_eq!(ids[0], "rec-000001");
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
