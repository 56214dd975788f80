//! Branch-and-select search over containment pairs.
//!
//! Each step picks a pair `(C, B)`, drops `C`, replaces `B` with its
//! tightened form and repeats on what is left. Every step gathers one
//! candidate list per explored branch and keeps the one the selection
//! strategy prefers.
//!
//! # Modules
//! - [`engine`]: the recursive driver and pair application
//! - [`parallel`]: fan-out of the root step onto a worker pool

pub mod engine;
pub mod parallel;

use crate::memo::{MemoTable, Metrics};
use crate::pair::IdGenerator;
use crate::strategy::SelectionStrategy;

pub use engine::{apply_pair, SearchEngine};
pub use parallel::search_parallel;

/// Knobs that shape the explored tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Look up and record subproblems in the memo table.
    pub memoize: bool,
    /// Also explore the branch that skips each pair without applying it.
    pub consider_skipped: bool,
    /// Explore at most this many pairs per step. `None` explores all.
    pub max_paths_per_step: Option<usize>,
}

impl SearchSettings {
    /// Upper bound of a window starting at `lo`, after the branch cap.
    #[inline]
    pub fn capped_end(&self, lo: usize, hi: usize) -> usize {
        match self.max_paths_per_step {
            Some(cap) => hi.min(lo.saturating_add(cap)),
            None => hi,
        }
    }

    /// True when the cap leaves every window empty.
    ///
    /// No move is ever applied, so a search returns its input unchanged.
    #[inline]
    pub fn explores_nothing(&self) -> bool {
        self.max_paths_per_step == Some(0)
    }
}

/// Shared state one search reads and writes.
///
/// Every member is `Sync`, so a single context serves all worker tasks.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub settings: SearchSettings,
    pub strategy: &'a dyn SelectionStrategy,
    pub memo: &'a MemoTable,
    pub metrics: &'a Metrics,
    pub ids: &'a IdGenerator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_shrinks_window() {
        let mut settings = SearchSettings {
            memoize: true,
            consider_skipped: false,
            max_paths_per_step: None,
        };
        assert_eq!(settings.capped_end(3, 10), 10);
        settings.max_paths_per_step = Some(5);
        assert_eq!(settings.capped_end(3, 10), 8);
        assert_eq!(settings.capped_end(0, 2), 2);
        assert!(!settings.explores_nothing());
        settings.max_paths_per_step = Some(0);
        assert_eq!(settings.capped_end(4, 10), 4);
        assert!(settings.explores_nothing());
    }
}
