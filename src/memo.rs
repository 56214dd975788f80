//! Memoization of search subproblems.
//!
//! A subproblem is identified by the multiset of its indexes in canonical
//! form: each index's sorted string, sorted, joined with `", "`. The table
//! stores a SHA-256 fingerprint of that string rather than the string itself,
//! since keys for wide schemas run to kilobytes.
//!
//! The table is shared by every task of one optimizer and lives as long as
//! the optimizer does. Entries are never evicted.
//!
//! # Design Principles
//! - **Order-free keys**: list order never changes the key
//! - **Lock-free reads**: `DashMap` shards the table, so parallel tasks rarely contend
//! - **Plain counters**: metrics are relaxed atomics, read as a snapshot
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Memoized search over overlapping subproblems: Bellman, "Dynamic Programming" (1957)

use crate::index::Index;
use crate::pair::TrackedIndex;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Domain tag mixed into every key hash.
const MEMO_KEY_DOMAIN: &[u8] = b"IndexOpt.MemoKey";

/// Fingerprint of a canonical subproblem string.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoKey(pub [u8; 32]);

impl MemoKey {
    /// Hashes `canonical` with domain separation and a length prefix.
    pub fn from_canonical(canonical: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(MEMO_KEY_DOMAIN);
        hasher.update(b":v1");
        hasher.update((canonical.len() as u64).to_le_bytes());
        hasher.update(canonical.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Key of a list of tracked indexes.
    pub fn of_tracked(slots: &[TrackedIndex]) -> Self {
        Self::from_canonical(&canonical_key(slots.iter().map(|s| s.index.as_ref())))
    }
}

impl fmt::Display for MemoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoKey({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Canonical, order-free string of an index list.
pub fn canonical_key<'a>(indexes: impl Iterator<Item = &'a Index>) -> String {
    let mut parts: Vec<String> = indexes.map(Index::to_sorted_string).collect();
    parts.sort();
    parts.join(", ")
}

/// Counters for memo usage and search effort.
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    branches: AtomicU64,
}

impl Metrics {
    /// Records a lookup served from the table.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that had to be computed.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one explored branch (one pair applied or skipped).
    pub fn record_branch(&self) {
        self.branches.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            memo_hits: self.hits.load(Ordering::Relaxed),
            memo_misses: self.misses.load(Ordering::Relaxed),
            memo_inserts: self.inserts.load(Ordering::Relaxed),
            branches_explored: self.branches.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.branches.store(0, Ordering::Relaxed);
    }
}

/// Plain copy of [`Metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub memo_hits: u64,
    pub memo_misses: u64,
    pub memo_inserts: u64,
    pub branches_explored: u64,
}

/// Concurrent map from subproblem key to its best reduced list.
#[derive(Debug, Default)]
pub struct MemoTable {
    entries: DashMap<MemoKey, Vec<Index>>,
}

impl MemoTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a stored result.
    pub fn get(&self, key: &MemoKey) -> Option<Vec<Index>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores a result, replacing any previous entry for the key.
    pub fn insert(&self, key: MemoKey, best: Vec<Index>) {
        self.entries.insert(key, best);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
