//! Memo of elements that are known not to be tab targets.
//!
//! A user parks the pointer over some control and rolls the wheel many
//! times; re-walking the UI tree for an element that already classified
//! as "not a tab" would burn a cross-process query per click. The cache
//! keys on runtime ids, so it survives repeated point lookups returning
//! fresh handles to the same element.
//!
//! Capacity is bounded with oldest-first eviction. A desktop session can
//! hover thousands of distinct controls, so an append-only set would grow
//! for the process lifetime.

use crate::tree::NodeId;
use std::collections::{HashSet, VecDeque};

/// Default number of remembered non-tab elements
pub const DEFAULT_CAPACITY: usize = 1024;

pub struct SkipCache {
    capacity: usize,
    seen: HashSet<NodeId>,
    order: VecDeque<NodeId>,
}

impl SkipCache {
    /// Create a cache remembering at most `capacity` identities.
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            seen: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.seen.contains(id)
    }

    /// Record an identity. Returns false if it was already present.
    /// At capacity, the oldest entry is evicted first.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.seen.insert(id.clone());
        self.order.push_back(id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}

impl Default for SkipCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
