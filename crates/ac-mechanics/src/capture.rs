//! Short-lived memory of recently observed rich damage structures.
//!
//! Entries are keyed by item identity and expire lazily: nothing is evicted
//! on a timer, [`CaptureCache::lookup`] just ignores entries older than the
//! freshness window. With the default capacity of one the cache behaves as
//! a single slot where the latest capture always wins.

use std::collections::VecDeque;

use ac_core::ItemId;

use crate::damage::RichDamageStructure;

/// Default freshness window in milliseconds.
pub const DEFAULT_TTL_MS: i64 = 30_000;

/// Default number of entries kept.
pub const DEFAULT_CAPACITY: usize = 1;

/// One captured structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEntry {
    /// Item the damage roll came from.
    pub item: ItemId,
    /// The normalized structure.
    pub structure: RichDamageStructure,
    /// Capture time in epoch milliseconds.
    pub captured_at: i64,
}

/// Keyed store of captured structures with a freshness window.
#[derive(Debug, Clone)]
pub struct CaptureCache {
    entries: VecDeque<CaptureEntry>,
    ttl_ms: i64,
    capacity: usize,
}

impl Default for CaptureCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MS, DEFAULT_CAPACITY)
    }
}

impl CaptureCache {
    /// Create a cache. A capacity of zero is raised to one.
    pub fn new(ttl_ms: i64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            ttl_ms,
            capacity,
        }
    }

    /// Change the freshness window and capacity, dropping the oldest
    /// entries if the capacity shrank.
    pub fn configure(&mut self, ttl_ms: i64, capacity: usize) {
        self.ttl_ms = ttl_ms;
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Store a structure for an item, replacing any earlier capture of the
    /// same item and evicting the oldest entry when full.
    pub fn record(&mut self, item: ItemId, structure: RichDamageStructure, now: i64) {
        self.entries.retain(|e| e.item != item);
        while self.entries.len() >= self.capacity {
            let Some(evicted) = self.entries.pop_front() else {
                break;
            };
            tracing::debug!(item = %evicted.item, "capture evicted");
        }
        self.entries.push_back(CaptureEntry {
            item,
            structure,
            captured_at: now,
        });
    }

    /// The captured structure for `item`, if one exists and is no older than
    /// the freshness window.
    pub fn lookup(&self, item: &ItemId, now: i64) -> Option<&RichDamageStructure> {
        let entry = self.entries.iter().find(|e| e.item == *item)?;
        let age = now.saturating_sub(entry.captured_at);
        if age > self.ttl_ms {
            tracing::debug!(item = %item, age, "capture is stale");
            return None;
        }
        Some(&entry.structure)
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The freshness window in milliseconds.
    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
