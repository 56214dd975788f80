//! Optimizer configuration.
//!
//! Every knob has a default, so a partial JSON document is a valid
//! configuration. Four presets cover the common modes.

use crate::error::Result;
use crate::search::SearchSettings;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Branch cap used by the fast presets.
pub const FAST_MAX_PATHS_PER_STEP: usize = 5;

/// Worker count used when the machine's parallelism cannot be queried.
pub const FALLBACK_THREADS: usize = 4;

/// Optimizer knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Rename fields to short ordinals during the search.
    pub mask_field_names: bool,
    /// Reuse results of identical subproblems.
    pub memoize: bool,
    /// Workers for the root fan-out; `1` runs on the calling thread.
    pub num_threads: usize,
    /// Also explore leaving each pair unapplied.
    pub consider_skipped: bool,
    /// Explore at most this many pairs per step. `None` explores all of them.
    pub max_paths_per_step: Option<usize>,
    /// Drop a field that already appeared earlier in the same index.
    pub remove_duplicate_fields: bool,
    /// How candidate lists are ranked.
    pub strategy: StrategyKind,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            mask_field_names: true,
            memoize: true,
            num_threads: 1,
            consider_skipped: false,
            max_paths_per_step: None,
            remove_duplicate_fields: false,
            strategy: StrategyKind::default(),
        }
    }
}

impl OptimizerConfig {
    /// Exhaustive search on the calling thread.
    pub fn default_single_threaded() -> Self {
        Self::default()
    }

    /// Branch-capped search on the calling thread.
    pub fn fast_single_threaded() -> Self {
        Self {
            max_paths_per_step: Some(FAST_MAX_PATHS_PER_STEP),
            ..Self::default()
        }
    }

    /// Exhaustive search with one worker per available CPU.
    pub fn default_multi_threaded() -> Self {
        Self {
            num_threads: available_threads(),
            ..Self::default()
        }
    }

    /// Branch-capped search with one worker per available CPU.
    pub fn fast_multi_threaded() -> Self {
        Self {
            num_threads: available_threads(),
            max_paths_per_step: Some(FAST_MAX_PATHS_PER_STEP),
            ..Self::default()
        }
    }

    /// Whether the root step fans out onto a pool.
    pub fn is_parallel(&self) -> bool {
        self.num_threads > 1
    }

    pub(crate) fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            memoize: self.memoize,
            consider_skipped: self.consider_skipped,
            max_paths_per_step: self.max_paths_per_step,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Number of CPUs available to this process.
pub fn available_threads() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(err) => {
            warn!(%err, fallback = FALLBACK_THREADS, "cannot query available parallelism");
            FALLBACK_THREADS
        }
    }
}
