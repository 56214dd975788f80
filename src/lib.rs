//! indexopt: reduction of composite database index sets.
//!
//! Given a list of composite indexes, finds a shorter list that serves the
//! same queries. An index `C` is dropped when some other index `B` can serve
//! it through a prefix; `B` is then tightened so that the prefix it now owes
//! `C` is fixed, and the remaining containments are re-checked against the
//! tightened form. A memoized branch-and-select search explores the order in
//! which such reductions are applied and keeps the best outcome according to
//! a pluggable selection strategy.
//!
//! # Index model
//!
//! An index is written `{{a,b}{c}}`: an ordered list of field groups. Group
//! order matters (it follows the equality / sort / range split of the queries
//! the index serves); order inside a group does not.
//!
//! # Design Principles
//! - **Identity, not value**: the search tracks index instances by id, so
//!   duplicate inputs collapse one instance at a time
//! - **Deterministic**: windows are stable-sorted and strategies keep input
//!   order; the parallel driver gathers results in dispatch order
//! - **Shared memo**: one concurrent table per optimizer, keyed by an
//!   order-free fingerprint of the subproblem
//!
//! # References
//! - MongoDB manual, "The ESR (Equality, Sort, Range) Rule"
//! - Bellman, "Dynamic Programming" (1957) – memoized search over overlapping subproblems
//!
//! # Example
//!
//! ```
//! use indexopt::prelude::*;
//!
//! let optimizer = IndexOptimizer::default_single_threaded();
//! let best = optimizer.optimize_str("{{a,b}}, {{b,a}}").unwrap();
//! assert_eq!(best.len(), 1);
//! assert_eq!(best[0].to_sorted_string(), "{{a,b}}");
//! ```

pub mod config;
pub mod constraint;
pub mod containment;
pub mod coverage;
pub mod error;
pub mod field;
pub mod index;
pub mod mask;
pub mod memo;
pub mod optimizer;
pub mod pair;
pub mod parser;
pub mod sanitize;
pub mod search;
pub mod strategy;

pub use config::{OptimizerConfig, FAST_MAX_PATHS_PER_STEP};
pub use coverage::{check_coverage, CoverageReport};
pub use error::{OptimizerError, ParseError};
pub use field::{Field, FieldGroup};
pub use index::Index;
pub use optimizer::{IndexOptimizer, OptimizerStats};
pub use parser::{parse_index, parse_index_list};
pub use sanitize::sanitize_indexes;
pub use strategy::{Chaining, Largest, MinSumOfSquares, SelectionStrategy, Smallest, StrategyKind};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::config::{OptimizerConfig, FAST_MAX_PATHS_PER_STEP};
    pub use crate::constraint::constrain;
    pub use crate::containment::{contains, covers};
    pub use crate::coverage::{check_coverage, CoverageReport};
    pub use crate::error::{OptimizerError, ParseError};
    pub use crate::field::{Field, FieldGroup};
    pub use crate::index::Index;
    pub use crate::optimizer::{IndexOptimizer, OptimizerStats};
    pub use crate::parser::{parse_index, parse_index_list};
    pub use crate::sanitize::sanitize_indexes;
    pub use crate::strategy::{
        Chaining, Largest, MinSumOfSquares, SelectionStrategy, Smallest, StrategyKind,
    };
}
