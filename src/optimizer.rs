//! The optimizer facade.
//!
//! Pipeline: sanitize → mask (optional) → pair generation → search →
//! unmask (optional).
//!
//! One optimizer owns one memo table for its whole lifetime, so repeated
//! calls on overlapping inputs get cheaper. Builder methods that change how
//! results are chosen clear the table.

use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::index::Index;
use crate::mask::FieldMask;
use crate::memo::{MemoTable, Metrics};
use crate::pair::IdGenerator;
use crate::parser::parse_index_list;
use crate::sanitize::sanitize_indexes;
use crate::search::parallel::build_pool;
use crate::search::{search_parallel, SearchContext, SearchEngine};
use crate::strategy::SelectionStrategy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Counters accumulated since construction (or the last reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerStats {
    pub memo_hits: u64,
    pub memo_misses: u64,
    pub memo_entries: usize,
    pub branches_explored: u64,
}

/// Reduces index lists by containment and constraint propagation.
#[derive(Debug)]
pub struct IndexOptimizer {
    config: OptimizerConfig,
    strategy: Arc<dyn SelectionStrategy>,
    memo: MemoTable,
    metrics: Metrics,
    ids: IdGenerator,
}

impl Default for IndexOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl IndexOptimizer {
    /// Creates an optimizer; the strategy is built from `config.strategy`.
    pub fn new(config: OptimizerConfig) -> Self {
        let strategy = config.strategy.build();
        Self {
            config,
            strategy,
            memo: MemoTable::new(),
            metrics: Metrics::default(),
            ids: IdGenerator::new(),
        }
    }

    pub fn default_single_threaded() -> Self {
        Self::new(OptimizerConfig::default_single_threaded())
    }

    /// Single-threaded, at most [`crate::config::FAST_MAX_PATHS_PER_STEP`]
    /// pairs explored per step.
    pub fn fast_single_threaded() -> Self {
        Self::new(OptimizerConfig::fast_single_threaded())
    }

    pub fn default_multi_threaded() -> Self {
        Self::new(OptimizerConfig::default_multi_threaded())
    }

    pub fn fast_multi_threaded() -> Self {
        Self::new(OptimizerConfig::fast_multi_threaded())
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    /// Installs a custom strategy object in place of `config.strategy`.
    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self.memo.clear();
        self
    }

    pub fn with_mask_field_names(mut self, on: bool) -> Self {
        self.config.mask_field_names = on;
        self
    }

    pub fn with_memoize(mut self, on: bool) -> Self {
        self.config.memoize = on;
        self.memo.clear();
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.config.num_threads = num_threads.max(1);
        self
    }

    pub fn with_consider_skipped(mut self, on: bool) -> Self {
        self.config.consider_skipped = on;
        self.memo.clear();
        self
    }

    pub fn with_max_paths_per_step(mut self, cap: Option<usize>) -> Self {
        self.config.max_paths_per_step = cap;
        self.memo.clear();
        self
    }

    pub fn with_remove_duplicate_fields(mut self, on: bool) -> Self {
        self.config.remove_duplicate_fields = on;
        self
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Reduces `indexes` to an equivalent, shorter list.
    ///
    /// Every sanitized input is covered by some output, and the output is
    /// never longer than the sanitized input.
    pub fn optimize(&self, indexes: &[Index]) -> Result<Vec<Index>> {
        let sanitized = sanitize_indexes(indexes, self.config.remove_duplicate_fields);
        debug!(
            input = indexes.len(),
            sanitized = sanitized.len(),
            threads = self.config.num_threads,
            cap = ?self.config.max_paths_per_step,
            strategy = %self.strategy.name(),
            "optimize"
        );

        let mask = self
            .config
            .mask_field_names
            .then(|| FieldMask::build(&sanitized));
        let working = match &mask {
            Some(mask) => mask.apply(sanitized),
            None => sanitized,
        };

        let engine = SearchEngine::new(SearchContext {
            settings: self.config.search_settings(),
            strategy: self.strategy.as_ref(),
            memo: &self.memo,
            metrics: &self.metrics,
            ids: &self.ids,
        });
        let best = if self.config.is_parallel() {
            let pool = build_pool(self.config.num_threads)?;
            search_parallel(&engine, &pool, working)?
        } else {
            engine.run(working)?
        };

        let best = match &mask {
            Some(mask) => mask.restore(best),
            None => best,
        };
        debug!(output = best.len(), memo_entries = self.memo.len(), "optimize done");
        Ok(best)
    }

    /// Parses a comma or newline separated list and optimizes it.
    pub fn optimize_str(&self, text: &str) -> Result<Vec<Index>> {
        let indexes = parse_index_list(text)?;
        self.optimize(&indexes)
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> String {
        self.strategy.name()
    }

    pub fn stats(&self) -> OptimizerStats {
        let snapshot = self.metrics.snapshot();
        OptimizerStats {
            memo_hits: snapshot.memo_hits,
            memo_misses: snapshot.memo_misses,
            memo_entries: self.memo.len(),
            branches_explored: snapshot.branches_explored,
        }
    }

    pub fn reset_stats(&self) {
        self.metrics.reset();
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Empties the memo table.
    pub fn clear_memo(&self) {
        self.memo.clear();
    }
}
