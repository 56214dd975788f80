//! Recursive search driver.
//!
//! # Determinism
//! Single-threaded runs are fully deterministic: windows are stable-sorted,
//! branches are explored in window order and the strategy keeps input order.

use super::SearchContext;
use crate::constraint::constrain;
use crate::containment::contains;
use crate::error::{OptimizerError, Result};
use crate::index::Index;
use crate::memo::MemoKey;
use crate::pair::{generate_pairs, sort_window, ContainmentPair, IdGenerator, TrackedIndex};
use std::sync::Arc;
use tracing::trace;

/// Applies `pairs[at]` to the working list.
///
/// Drops the contained instance, swaps the containing instance for its
/// tightened form (under a fresh id) and rewrites the pair list:
/// - pairs mentioning the dropped instance go away;
/// - pairs whose containing side was the old instance are checked against
///   the tightened form and either retargeted or dropped;
/// - everything else is kept as is.
pub fn apply_pair(
    ids: &IdGenerator,
    slots: &[TrackedIndex],
    pairs: &[ContainmentPair],
    at: usize,
) -> (Vec<TrackedIndex>, Vec<ContainmentPair>) {
    let pair = &pairs[at];
    let removed = pair.contained.id;
    let old = pair.containing.id;
    let tightened = TrackedIndex {
        id: ids.fresh(),
        index: Arc::new(constrain(&pair.contained.index, &pair.containing.index)),
    };

    let next_slots: Vec<TrackedIndex> = slots
        .iter()
        .filter(|slot| slot.id != removed)
        .map(|slot| {
            if slot.id == old {
                tightened.clone()
            } else {
                slot.clone()
            }
        })
        .collect();

    let next_pairs: Vec<ContainmentPair> = pairs
        .iter()
        .filter(|p| !p.mentions(removed))
        .filter_map(|p| {
            if p.containing.id != old {
                return Some(p.clone());
            }
            contains(&p.contained.index, &tightened.index).then(|| ContainmentPair {
                contained: p.contained.clone(),
                containing: tightened.clone(),
            })
        })
        .collect();

    (next_slots, next_pairs)
}

fn untracked(slots: &[TrackedIndex]) -> Vec<Index> {
    slots.iter().map(|slot| slot.index.as_ref().clone()).collect()
}

/// Recursive branch-and-select over one search context.
#[derive(Clone, Copy)]
pub struct SearchEngine<'a> {
    ctx: SearchContext<'a>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(ctx: SearchContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &SearchContext<'a> {
        &self.ctx
    }

    /// Reduces `indexes` as far as the settings allow.
    pub fn run(&self, indexes: Vec<Index>) -> Result<Vec<Index>> {
        let slots: Vec<TrackedIndex> = indexes.into_iter().map(|ix| self.ctx.ids.track(ix)).collect();
        let pairs = generate_pairs(&slots);
        if pairs.is_empty() || self.ctx.settings.explores_nothing() {
            return Ok(untracked(&slots));
        }
        let len = pairs.len();
        self.search(&slots, &pairs, 0, len, 0)
    }

    /// Best reduction of `slots`, exploring `pairs[lo..hi]` at this step.
    ///
    /// Consults and fills the memo table when memoization is on.
    pub fn search(
        &self,
        slots: &[TrackedIndex],
        pairs: &[ContainmentPair],
        lo: usize,
        hi: usize,
        depth: usize,
    ) -> Result<Vec<Index>> {
        let key = self.ctx.settings.memoize.then(|| MemoKey::of_tracked(slots));
        if let Some(key) = &key {
            if let Some(hit) = self.ctx.memo.get(key) {
                self.ctx.metrics.record_hit();
                trace!(depth, %key, "memo hit");
                return Ok(hit);
            }
            self.ctx.metrics.record_miss();
        }

        let candidates = self.branches(slots, pairs, lo, hi, depth)?;
        let best = self.select(candidates)?;

        if let Some(key) = key {
            self.ctx.memo.insert(key, best.clone());
            self.ctx.metrics.record_insert();
        }
        Ok(best)
    }

    /// One candidate list per explored branch of `pairs[lo..hi]`.
    ///
    /// The window is sorted on a private copy, then cut down to the branch
    /// cap. No memo lookup happens for `slots` itself.
    pub fn branches(
        &self,
        slots: &[TrackedIndex],
        pairs: &[ContainmentPair],
        lo: usize,
        hi: usize,
        depth: usize,
    ) -> Result<Vec<Vec<Index>>> {
        let mut pairs = pairs.to_vec();
        sort_window(&mut pairs, lo, hi);
        let hi = self.ctx.settings.capped_end(lo, hi);

        let mut candidates = Vec::with_capacity(hi.saturating_sub(lo));
        for i in lo..hi {
            pairs[i].check()?;
            self.ctx.metrics.record_branch();
            trace!(depth, pair = %pairs[i], "apply");

            let (next_slots, next_pairs) = apply_pair(self.ctx.ids, slots, &pairs, i);
            if next_pairs.is_empty() {
                candidates.push(untracked(&next_slots));
            } else {
                let len = next_pairs.len();
                candidates.push(self.search(&next_slots, &next_pairs, 0, len, depth + 1)?);
            }

            if self.ctx.settings.consider_skipped {
                self.ctx.metrics.record_branch();
                trace!(depth, pair = %pairs[i], "skip");
                let mut rest = pairs.clone();
                rest.remove(i);
                if rest.is_empty() {
                    candidates.push(untracked(slots));
                } else {
                    let len = rest.len();
                    candidates.push(self.search(slots, &rest, 0, len, depth + 1)?);
                }
            }
        }
        Ok(candidates)
    }

    /// Runs the strategy and takes its first winner.
    pub fn select(&self, candidates: Vec<Vec<Index>>) -> Result<Vec<Index>> {
        self.ctx
            .strategy
            .choose_best_set(candidates)
            .ok_or_else(|| OptimizerError::EmptySelection {
                strategy: self.ctx.strategy.name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sorted_strings;
    use crate::memo::{MemoTable, Metrics};
    use crate::parser::parse_index_list;
    use crate::search::SearchSettings;
    use crate::strategy::{Chaining, MinSumOfSquares, SelectionStrategy, Smallest};

    struct Fixture {
        strategy: Chaining,
        memo: MemoTable,
        metrics: Metrics,
        ids: IdGenerator,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                strategy: Chaining::new(Vec::new()).then(Smallest).then(MinSumOfSquares),
                memo: MemoTable::new(),
                metrics: Metrics::default(),
                ids: IdGenerator::new(),
            }
        }

        fn engine(&self, settings: SearchSettings) -> SearchEngine<'_> {
            SearchEngine::new(SearchContext {
                settings,
                strategy: &self.strategy,
                memo: &self.memo,
                metrics: &self.metrics,
                ids: &self.ids,
            })
        }
    }

    fn settings(memoize: bool) -> SearchSettings {
        SearchSettings {
            memoize,
            consider_skipped: false,
            max_paths_per_step: None,
        }
    }

    fn run(engine: &SearchEngine<'_>, text: &str) -> Vec<String> {
        sorted_strings(&engine.run(parse_index_list(text).unwrap()).unwrap())
    }

    #[test]
    fn apply_pair_tightens_and_retargets() {
        let ids = IdGenerator::new();
        let slots: Vec<TrackedIndex> = parse_index_list("{{x,y,z}}, {{z,y}}, {{z,x}}, {{x}}")
            .unwrap()
            .into_iter()
            .map(|ix| ids.track(ix))
            .collect();
        let pairs = generate_pairs(&slots);

        // `{{x}} <= {{z,x}}`
        let (next_slots, next_pairs) = apply_pair(&ids, &slots, &pairs, 3);
        let printed: Vec<String> = next_slots.iter().map(|s| s.index.to_string()).collect();
        assert_eq!(printed, ["{{x,y,z}}", "{{z,y}}", "{{x}{z}}"]);
        assert_ne!(next_slots[2].id, slots[2].id);
        // Only `{{z,y}} <= {{x,y,z}}` and `{{z,x}} <= {{x,y,z}}` survive; the
        // second is stale since its contained side was replaced.
        assert_eq!(next_pairs.len(), 2);
        assert_eq!(next_pairs[1].contained.id, slots[2].id);
    }

    #[test]
    fn apply_pair_drops_pairs_broken_by_tightening() {
        let ids = IdGenerator::new();
        let slots: Vec<TrackedIndex> = parse_index_list("{{a,b,c}}, {{a}}, {{b}}")
            .unwrap()
            .into_iter()
            .map(|ix| ids.track(ix))
            .collect();
        let pairs = generate_pairs(&slots);
        assert_eq!(pairs.len(), 2);

        let (next_slots, next_pairs) = apply_pair(&ids, &slots, &pairs, 0);
        assert_eq!(next_slots[0].index.to_string(), "{{a}{b,c}}");
        // `{{b}}` no longer fits in front of `{{a}{b,c}}`.
        assert!(next_pairs.is_empty());
    }

    #[test]
    fn reduces_with_and_without_memo() {
        for memoize in [true, false] {
            let fx = Fixture::new();
            let engine = fx.engine(settings(memoize));
            assert_eq!(
                run(&engine, "{{x,y,z}}, {{z,y}}, {{z,x}}, {{x}}"),
                ["{{x}{z}}", "{{y,z}{x}}"]
            );
        }
    }

    #[test]
    fn memo_records_subproblems() {
        let fx = Fixture::new();
        let engine = fx.engine(settings(true));
        run(&engine, "{{a,d,f,g,j,n,r,t,z}}, {{d,g,r}}, {{a,z}}, {{b,r}}, {{g}}");
        let stats = fx.metrics.snapshot();
        assert!(stats.memo_inserts > 0);
        assert_eq!(stats.memo_inserts as usize, fx.memo.len());
        assert!(stats.branches_explored > 0);
    }

    #[test]
    fn no_pairs_returns_input() {
        let fx = Fixture::new();
        let engine = fx.engine(settings(true));
        assert_eq!(run(&engine, "{{a,c}}, {{a}{b}{c}}"), ["{{a,c}}", "{{a}{b}{c}}"]);
        assert_eq!(fx.metrics.snapshot().branches_explored, 0);
    }

    #[test]
    fn skip_branches_are_explored() {
        let fx = Fixture::new();
        let engine = fx.engine(SearchSettings {
            memoize: true,
            consider_skipped: true,
            max_paths_per_step: None,
        });
        assert_eq!(run(&engine, "{{a,b}}, {{a}}"), ["{{a}{b}}"]);
        // Apply and skip for the single pair.
        assert_eq!(fx.metrics.snapshot().branches_explored, 2);
    }

    #[test]
    fn zero_cap_returns_input() {
        let fx = Fixture::new();
        let engine = fx.engine(SearchSettings {
            memoize: true,
            consider_skipped: false,
            max_paths_per_step: Some(0),
        });
        assert_eq!(run(&engine, "{{a,b}}, {{a}}"), ["{{a,b}}", "{{a}}"]);
        assert_eq!(fx.metrics.snapshot().branches_explored, 0);
        assert!(fx.memo.is_empty());
    }

    #[derive(Debug)]
    struct Nothing;

    impl SelectionStrategy for Nothing {
        fn name(&self) -> String {
            "nothing".to_owned()
        }

        fn choose_best_sets(&self, _: Vec<Vec<Index>>) -> Vec<Vec<Index>> {
            Vec::new()
        }
    }

    #[test]
    fn empty_selection_is_an_error() {
        let fx = Fixture::new();
        let engine = SearchEngine::new(SearchContext {
            settings: settings(false),
            strategy: &Nothing,
            memo: &fx.memo,
            metrics: &fx.metrics,
            ids: &fx.ids,
        });
        let err = engine.run(parse_index_list("{{a,b}}, {{a}}").unwrap()).unwrap_err();
        assert!(matches!(err, OptimizerError::EmptySelection { strategy } if strategy == "nothing"));
    }
}
