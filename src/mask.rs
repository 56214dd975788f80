//! Field-name masking.
//!
//! Long schema-qualified names make canonical strings, and therefore memo
//! keys, expensive to build and compare. Masking renames every field to the
//! decimal string of its first-appearance ordinal before the search and maps
//! the result back afterwards.

use crate::field::Field;
use crate::index::Index;
use std::collections::HashMap;

/// Bidirectional field renaming built from an index list.
#[derive(Debug, Clone, Default)]
pub struct FieldMask {
    forward: HashMap<Field, Field>,
    inverse: HashMap<Field, Field>,
}

impl FieldMask {
    /// Assigns `0, 1, 2, …` to distinct field names in first-appearance order
    /// (index by index, group by group, field by field).
    pub fn build(indexes: &[Index]) -> Self {
        let mut mask = Self::default();
        for field in indexes.iter().flat_map(Index::fields) {
            if !mask.forward.contains_key(field) {
                let masked = Field::new(mask.forward.len().to_string());
                mask.inverse.insert(masked.clone(), field.clone());
                mask.forward.insert(field.clone(), masked);
            }
        }
        mask
    }

    /// Number of distinct fields mapped.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Renames every mapped field to its masked name.
    pub fn apply(&self, indexes: Vec<Index>) -> Vec<Index> {
        rename(indexes, &self.forward)
    }

    /// Renames every masked field back to its original name.
    pub fn restore(&self, indexes: Vec<Index>) -> Vec<Index> {
        rename(indexes, &self.inverse)
    }
}

fn rename(mut indexes: Vec<Index>, map: &HashMap<Field, Field>) -> Vec<Index> {
    for index in &mut indexes {
        for group in index.groups_mut().iter_mut() {
            *group = group
                .iter()
                .map(|f| map.get(f).cloned().unwrap_or_else(|| f.clone()))
                .collect();
        }
    }
    indexes
}
