//! Coverage check of an optimized index list against the originals.
//!
//! Uses the merge predicate [`covers`], so an original is covered when some
//! optimized index can serve every query it served.

use crate::containment::covers;
use crate::index::Index;
use serde::{Deserialize, Serialize};

/// Originals split by whether some covering index serves them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Covered originals, each with every covering index, in input order.
    pub covered: Vec<(Index, Vec<Index>)>,
    /// Originals no covering index serves, in input order.
    pub not_covered: Vec<Index>,
}

impl CoverageReport {
    /// True when every original is covered.
    pub fn is_complete(&self) -> bool {
        self.not_covered.is_empty()
    }

    pub fn covered_count(&self) -> usize {
        self.covered.len()
    }
}

/// Partitions `originals` by coverage through `covering`.
pub fn check_coverage(originals: &[Index], covering: &[Index]) -> CoverageReport {
    let mut report = CoverageReport::default();
    for original in originals {
        let found: Vec<Index> = covering
            .iter()
            .filter(|candidate| covers(original, candidate))
            .cloned()
            .collect();
        if found.is_empty() {
            report.not_covered.push(original.clone());
        } else {
            report.covered.push((original.clone(), found));
        }
    }
    report
}
