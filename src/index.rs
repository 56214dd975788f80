//! Composite index values.
//!
//! An [`Index`] is an ordered list of [`FieldGroup`]s. The group order encodes
//! the prefix constraint (equality fields first, then sort fields, then range
//! fields); the order of fields inside a group does not matter.
//!
//! # Citations
//! - ESR guideline: MongoDB manual, "The ESR (Equality, Sort, Range) Rule"

use crate::field::{Field, FieldGroup};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A composite index.
///
/// `PartialEq` compares groups element-wise in stored order. Compare
/// [`Index::to_sorted_string`] forms to ignore within-group permutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    groups: Vec<FieldGroup>,
}

impl Index {
    /// Creates an index with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index from groups, keeping their order.
    pub fn from_groups(groups: Vec<FieldGroup>) -> Self {
        Self { groups }
    }

    /// Appends a group.
    pub fn push_group(&mut self, group: FieldGroup) {
        self.groups.push(group);
    }

    /// Groups in order.
    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    /// Mutable access for in-place rewrites (sanitizing, masking).
    pub(crate) fn groups_mut(&mut self) -> &mut Vec<FieldGroup> {
        &mut self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of fields across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(FieldGroup::len).sum()
    }

    /// True when the index holds no field at all.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(FieldGroup::is_empty)
    }

    /// All fields, group by group, in stored order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.groups.iter().flat_map(FieldGroup::iter)
    }

    /// Canonical form with names sorted inside every group.
    pub fn to_sorted_string(&self) -> String {
        let mut out = String::with_capacity(2 + self.groups.len() * 4);
        out.push('{');
        for group in &self.groups {
            out.push_str(&group.to_sorted_string());
        }
        out.push('}');
        out
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for group in &self.groups {
            write!(f, "{group}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<FieldGroup> for Index {
    fn from_iter<I: IntoIterator<Item = FieldGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// Sorted canonical strings of a list of indexes, for order-free comparison.
pub fn sorted_strings(indexes: &[Index]) -> Vec<String> {
    let mut out: Vec<String> = indexes.iter().map(Index::to_sorted_string).collect();
    out.sort();
    out
}
