//! Composition of selection strategies.

use super::SelectionStrategy;
use crate::index::Index;
use std::sync::Arc;

/// Applies strategies in order, each one narrowing the previous winners.
///
/// Stops early once at most one candidate is left.
#[derive(Debug, Clone)]
pub struct Chaining {
    strategies: Vec<Arc<dyn SelectionStrategy>>,
}

impl Chaining {
    pub fn new(strategies: Vec<Arc<dyn SelectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Appends a tie-breaker.
    pub fn then(mut self, next: impl SelectionStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(next));
        self
    }
}

impl SelectionStrategy for Chaining {
    fn name(&self) -> String {
        let names: Vec<String> = self.strategies.iter().map(|s| s.name()).collect();
        format!("chain({})", names.join(","))
    }

    fn choose_best_sets(&self, candidates: Vec<Vec<Index>>) -> Vec<Vec<Index>> {
        let mut remaining = candidates;
        for strategy in &self.strategies {
            if remaining.len() <= 1 {
                break;
            }
            remaining = strategy.choose_best_sets(remaining);
        }
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_index_list;
    use crate::strategy::{Largest, MinSumOfSquares, Smallest};

    fn list(s: &str) -> Vec<Index> {
        parse_index_list(s).unwrap()
    }

    #[test]
    fn tie_breaker_runs_on_first_winners() {
        let chain = Chaining::new(Vec::new()).then(Smallest).then(MinSumOfSquares);
        let best = chain.choose_best_set(vec![
            list("{{a}}, {{b,c,d,e}}"),
            list("{{a,b}}, {{c,d,e}}"),
            list("{{a}}, {{b}}, {{c}}"),
        ]);
        assert_eq!(best, Some(list("{{a,b}}, {{c,d,e}}")));
    }

    #[test]
    fn single_candidate_short_circuits() {
        let chain = Chaining::new(vec![Arc::new(Largest), Arc::new(Smallest)]);
        let only = vec![list("{{a}}, {{b}}")];
        assert_eq!(chain.choose_best_sets(only.clone()), only);
    }

    #[test]
    fn empty_chain_keeps_everything() {
        let chain = Chaining::new(Vec::new());
        let all = vec![list("{{a}}"), list("{{b}}")];
        assert_eq!(chain.choose_best_sets(all.clone()), all);
        assert_eq!(chain.name(), "chain()");
    }
}
