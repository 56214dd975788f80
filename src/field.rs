//! Fields and field groups.
//!
//! A [`FieldGroup`] is stored as an ordered `Vec` so that the raw printed form
//! round-trips, but every comparison the optimizer makes treats it as a set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named index field.
///
/// Equality, hashing and ordering depend only on the name.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(String);

impl Field {
    /// Creates a field with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A group of fields whose relative order is free.
///
/// Within an index, each group must be satisfied before the next one; fields
/// inside a group may be permuted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldGroup {
    fields: Vec<Field>,
}

impl FieldGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Removes the first occurrence of `field`. Returns whether it was present.
    pub fn remove(&mut self, field: &Field) -> bool {
        match self.fields.iter().position(|f| f == field) {
            Some(pos) => {
                self.fields.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Membership test.
    #[inline]
    pub fn contains(&self, field: &Field) -> bool {
        self.fields.contains(field)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Fields in stored order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Keeps only the fields for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Field) -> bool) {
        self.fields.retain(keep);
    }

    /// Canonical form: `{a,b,c}` with names sorted.
    pub fn to_sorted_string(&self) -> String {
        let mut names: Vec<&str> = self.fields.iter().map(Field::name).collect();
        names.sort_unstable();
        format!("{{{}}}", names.join(","))
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<Field> for FieldGroup {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FieldGroup {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
