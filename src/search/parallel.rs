//! Root fan-out onto a worker pool.
//!
//! The full pair list is sorted once; each of the first `min(cap, |pairs|)`
//! root moves then becomes one task exploring the single-pair window
//! `[i, i + 1)`. Deeper levels run sequentially inside their task and share
//! the memo table with every other task. Task results are gathered in
//! dispatch order and reduced through the selection strategy, so the outcome
//! does not depend on scheduling.

use super::engine::SearchEngine;
use crate::error::{OptimizerError, Result};
use crate::index::Index;
use crate::memo::MemoKey;
use crate::pair::{generate_pairs, sort_window, TrackedIndex};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::debug;

/// Builds a pool with `num_threads` named workers.
pub fn build_pool(num_threads: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("indexopt-search-{i}"))
        .build()
        .map_err(|e| OptimizerError::WorkerPool(e.to_string()))
}

/// Reduces `indexes` with root moves dispatched onto `pool`.
///
/// The root result is looked up in and recorded into the memo table when
/// memoization is on; the tasks themselves skip the root lookup.
pub fn search_parallel(
    engine: &SearchEngine<'_>,
    pool: &ThreadPool,
    indexes: Vec<Index>,
) -> Result<Vec<Index>> {
    let ctx = engine.context();
    let slots: Vec<TrackedIndex> = indexes.into_iter().map(|ix| ctx.ids.track(ix)).collect();
    let mut pairs = generate_pairs(&slots);
    if pairs.is_empty() || ctx.settings.explores_nothing() {
        return Ok(slots.iter().map(|s| s.index.as_ref().clone()).collect());
    }

    let key = ctx.settings.memoize.then(|| MemoKey::of_tracked(&slots));
    if let Some(key) = &key {
        if let Some(hit) = ctx.memo.get(key) {
            ctx.metrics.record_hit();
            return Ok(hit);
        }
        ctx.metrics.record_miss();
    }

    let len = pairs.len();
    sort_window(&mut pairs, 0, len);
    let roots = ctx.settings.capped_end(0, len);
    debug!(pairs = len, roots, threads = pool.current_num_threads(), "dispatching root moves");

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        pool.install(|| {
            (0..roots)
                .into_par_iter()
                .map(|i| {
                    let candidates = engine.branches(&slots, &pairs, i, i + 1, 0)?;
                    engine.select(candidates)
                })
                .collect::<Result<Vec<Vec<Index>>>>()
        })
    }));
    let per_root = match outcome {
        Ok(result) => result?,
        Err(payload) => return Err(OptimizerError::WorkerPanicked(panic_message(&*payload))),
    };

    let best = engine.select(per_root)?;
    if let Some(key) = key {
        ctx.memo.insert(key, best.clone());
        ctx.metrics.record_insert();
    }
    Ok(best)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
