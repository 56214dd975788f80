//! Selection strategies for candidate index lists.
//!
//! A strategy receives every candidate list one search step produced and
//! returns the winners, keeping their input order. The engine always takes
//! the first winner, so ties are broken by exploration order.

pub mod chain;

use crate::index::Index;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use chain::Chaining;

/// Scores candidate index lists and keeps the best ones.
///
/// Implementations must be deterministic and must return a subset of their
/// input in input order.
pub trait SelectionStrategy: Send + Sync + fmt::Debug {
    /// Short name used in logs and error messages.
    fn name(&self) -> String;

    /// Returns every candidate tied for best.
    fn choose_best_sets(&self, candidates: Vec<Vec<Index>>) -> Vec<Vec<Index>>;

    /// Returns the first winner, if any.
    fn choose_best_set(&self, candidates: Vec<Vec<Index>>) -> Option<Vec<Index>> {
        self.choose_best_sets(candidates).into_iter().next()
    }
}

/// Keeps the candidates whose score equals the minimum.
fn keep_minimal<F>(candidates: Vec<Vec<Index>>, score: F) -> Vec<Vec<Index>>
where
    F: Fn(&[Index]) -> usize,
{
    let Some(best) = candidates.iter().map(|c| score(c.as_slice())).min() else {
        return candidates;
    };
    candidates.into_iter().filter(|c| score(c.as_slice()) == best).collect()
}

/// Fewest indexes wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Smallest;

impl SelectionStrategy for Smallest {
    fn name(&self) -> String {
        "smallest".to_owned()
    }

    fn choose_best_sets(&self, candidates: Vec<Vec<Index>>) -> Vec<Vec<Index>> {
        keep_minimal(candidates, |c| c.len())
    }
}

/// Most indexes wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Largest;

impl SelectionStrategy for Largest {
    fn name(&self) -> String {
        "largest".to_owned()
    }

    fn choose_best_sets(&self, candidates: Vec<Vec<Index>>) -> Vec<Vec<Index>> {
        keep_minimal(candidates, |c| usize::MAX - c.len())
    }
}

/// Smallest sum of squared index lengths wins.
///
/// Favours lists made of several short indexes over one very wide index
/// with the same total field count.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinSumOfSquares;

impl MinSumOfSquares {
    pub fn score(indexes: &[Index]) -> usize {
        indexes.iter().map(|ix| ix.len() * ix.len()).sum()
    }
}

impl SelectionStrategy for MinSumOfSquares {
    fn name(&self) -> String {
        "min_sum_of_squares".to_owned()
    }

    fn choose_best_sets(&self, candidates: Vec<Vec<Index>>) -> Vec<Vec<Index>> {
        keep_minimal(candidates, Self::score)
    }
}

/// Serializable description of a strategy, used by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Smallest,
    Largest,
    MinSumOfSquares,
    Chain(Vec<StrategyKind>),
}

impl Default for StrategyKind {
    /// Fewest indexes, then smallest sum of squares.
    fn default() -> Self {
        StrategyKind::Chain(vec![StrategyKind::Smallest, StrategyKind::MinSumOfSquares])
    }
}

impl StrategyKind {
    /// Instantiates the described strategy.
    pub fn build(&self) -> Arc<dyn SelectionStrategy> {
        match self {
            StrategyKind::Smallest => Arc::new(Smallest),
            StrategyKind::Largest => Arc::new(Largest),
            StrategyKind::MinSumOfSquares => Arc::new(MinSumOfSquares),
            StrategyKind::Chain(parts) => {
                Arc::new(Chaining::new(parts.iter().map(StrategyKind::build).collect()))
            }
        }
    }
}
