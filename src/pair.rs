//! Tracked indexes and containment pairs.
//!
//! During a search, "the same index" means the same tracked instance, not an
//! equal value: two identical inputs are distinct instances, and the tightened
//! form of a containing index is a new instance. Every working index therefore
//! carries an [`IndexId`] issued by an [`IdGenerator`].
//!
//! # Determinism
//! - Pairs are generated with the containing position as the outer loop.
//! - Branch ordering uses a stable sort, so ties keep generation order.

use crate::containment::contains;
use crate::error::{OptimizerError, Result};
use crate::index::Index;
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Identity of one working index instance.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexId(u64);

impl IndexId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexId({})", self.0)
    }
}

/// Issues fresh [`IndexId`]s. Shared by all tasks of one optimizer.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an id never returned before by this generator.
    pub fn fresh(&self) -> IndexId {
        IndexId::new(self.next.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps `index` as a new tracked instance.
    pub fn track(&self, index: Index) -> TrackedIndex {
        TrackedIndex {
            id: self.fresh(),
            index: Arc::new(index),
        }
    }
}

/// An index value together with the identity of its instance.
///
/// Cloning is cheap: the index itself is shared.
#[derive(Debug, Clone)]
pub struct TrackedIndex {
    pub id: IndexId,
    pub index: Arc<Index>,
}

impl TrackedIndex {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

/// `contained` can be served by a prefix of `containing`.
#[derive(Debug, Clone)]
pub struct ContainmentPair {
    pub contained: TrackedIndex,
    pub containing: TrackedIndex,
}

impl ContainmentPair {
    /// Whether either side is the instance `id`.
    #[inline]
    pub fn mentions(&self, id: IndexId) -> bool {
        self.contained.id == id || self.containing.id == id
    }

    /// Rejects pairs that can never hold: the contained side is longer.
    pub fn check(&self) -> Result<()> {
        if self.contained.len() > self.containing.len() {
            return Err(OptimizerError::ContainmentInvariant {
                contained: self.contained.index.to_string(),
                containing: self.containing.index.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ContainmentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <= {}", self.contained.index, self.containing.index)
    }
}

/// Enumerates every containment pair among `slots`.
///
/// A pair `(C, B)` is emitted for distinct positions when `|B| >= |C|` and
/// `contains(C, B)`. Two equal indexes produce two mutually containing pairs.
pub fn generate_pairs(slots: &[TrackedIndex]) -> Vec<ContainmentPair> {
    let mut pairs = Vec::new();
    for (i, containing) in slots.iter().enumerate() {
        for (j, contained) in slots.iter().enumerate() {
            if i != j
                && containing.len() >= contained.len()
                && contains(&contained.index, &containing.index)
            {
                pairs.push(ContainmentPair {
                    contained: contained.clone(),
                    containing: containing.clone(),
                });
            }
        }
    }
    pairs
}

/// Exploration priority of one pair.
///
/// Order key:
/// 1. how many pairs (in the whole list) share this containing index's
///    canonical form, ascending
/// 2. containing length, descending
/// 3. contained length, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchKey {
    pub containing_fanout: usize,
    pub containing_len: usize,
    pub contained_len: usize,
}

impl Ord for BranchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (
            self.containing_fanout,
            Reverse(self.containing_len),
            self.contained_len,
        )
            .cmp(&(
                other.containing_fanout,
                Reverse(other.containing_len),
                other.contained_len,
            ))
    }
}

impl PartialOrd for BranchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stable-sorts `pairs[lo..hi]` by [`BranchKey`].
///
/// Fan-out counts are taken over the whole slice, not just the window.
pub fn sort_window(pairs: &mut [ContainmentPair], lo: usize, hi: usize) {
    if hi <= lo + 1 {
        return;
    }
    let mut fanout: HashMap<String, usize> = HashMap::new();
    for pair in pairs.iter() {
        *fanout.entry(pair.containing.index.to_sorted_string()).or_insert(0) += 1;
    }
    pairs[lo..hi].sort_by_cached_key(|pair| BranchKey {
        containing_fanout: fanout
            .get(&pair.containing.index.to_sorted_string())
            .copied()
            .unwrap_or(0),
        containing_len: pair.containing.len(),
        contained_len: pair.contained.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_index;

    fn track_all(ids: &IdGenerator, texts: &[&str]) -> Vec<TrackedIndex> {
        texts
            .iter()
            .map(|t| ids.track(parse_index(t).unwrap()))
            .collect()
    }

    fn rendered(pairs: &[ContainmentPair]) -> Vec<String> {
        pairs.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn ids_are_unique() {
        let ids = IdGenerator::new();
        let a = ids.fresh();
        let b = ids.fresh();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(IndexId::new(3).to_string(), "IndexId(3)");
    }

    #[test]
    fn pairs_follow_containing_major_order() {
        let ids = IdGenerator::new();
        let slots = track_all(&ids, &["{{x,y,z}}", "{{z,y}}", "{{z,x}}", "{{x}}"]);
        let pairs = generate_pairs(&slots);
        assert_eq!(
            rendered(&pairs),
            [
                "{{z,y}} <= {{x,y,z}}",
                "{{z,x}} <= {{x,y,z}}",
                "{{x}} <= {{x,y,z}}",
                "{{x}} <= {{z,x}}",
            ]
        );
    }

    #[test]
    fn duplicates_contain_each_other() {
        let ids = IdGenerator::new();
        let slots = track_all(&ids, &["{{a,b}}", "{{b,a}}"]);
        let pairs = generate_pairs(&slots);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].contained.id, slots[1].id);
        assert_eq!(pairs[1].contained.id, slots[0].id);
    }

    #[test]
    fn unrelated_indexes_yield_no_pairs() {
        let ids = IdGenerator::new();
        let slots = track_all(&ids, &["{{a,c}}", "{{a}{b}{c}}"]);
        assert!(generate_pairs(&slots).is_empty());
    }

    #[test]
    fn window_sort_prefers_rare_and_long_containers() {
        let ids = IdGenerator::new();
        let slots = track_all(&ids, &["{{x,y,z}}", "{{z,y}}", "{{z,x}}", "{{x}}"]);
        let mut pairs = generate_pairs(&slots);
        let len = pairs.len();
        sort_window(&mut pairs, 0, len);
        assert_eq!(
            rendered(&pairs),
            [
                "{{x}} <= {{z,x}}",
                "{{x}} <= {{x,y,z}}",
                "{{z,y}} <= {{x,y,z}}",
                "{{z,x}} <= {{x,y,z}}",
            ]
        );
    }

    #[test]
    fn window_sort_leaves_outside_untouched() {
        let ids = IdGenerator::new();
        let slots = track_all(&ids, &["{{x,y,z}}", "{{z,y}}", "{{z,x}}", "{{x}}"]);
        let mut pairs = generate_pairs(&slots);
        let before = rendered(&pairs);
        sort_window(&mut pairs, 0, 2);
        // Both pairs in the window tie on every key.
        assert_eq!(rendered(&pairs), before);
    }

    #[test]
    fn check_rejects_longer_contained_side() {
        let ids = IdGenerator::new();
        let slots = track_all(&ids, &["{{a,b}}", "{{a}}"]);
        let bad = ContainmentPair {
            contained: slots[0].clone(),
            containing: slots[1].clone(),
        };
        assert!(matches!(bad.check(), Err(OptimizerError::ContainmentInvariant { .. })));
        let good = ContainmentPair {
            contained: slots[1].clone(),
            containing: slots[0].clone(),
        };
        assert!(good.check().is_ok());
    }
}
