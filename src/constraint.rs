//! Ordering-constraint propagation.
//!
//! When a contained index `C` is dropped in favour of a containing index `B`,
//! `B` must keep serving `C`'s queries. The tightened index therefore starts
//! with `C`'s groups verbatim and keeps only what is left of `B` behind them.

use crate::field::{Field, FieldGroup};
use crate::index::Index;
use std::collections::VecDeque;

/// Builds the tightened form of `containing` that also serves `contained`.
///
/// The result's leading groups are exactly `contained`'s groups, in order.
/// `contained`'s fields, flattened in order, are then struck from
/// `containing`: each group of `containing` loses fields from the front of
/// that queue for as long as the queue head lies in the group. Groups left
/// non-empty follow in their original order.
///
/// The caller is expected to have checked `contains(contained, containing)`;
/// under that precondition every field of `contained` is struck exactly once
/// and `result.len() == containing.len()`.
pub fn constrain(contained: &Index, containing: &Index) -> Index {
    let mut groups: Vec<FieldGroup> = contained.groups().to_vec();
    let mut pending: VecDeque<&Field> = contained.fields().collect();

    for group in containing.groups() {
        let mut rest = group.clone();
        while let Some(head) = pending.front() {
            if !rest.remove(head) {
                break;
            }
            pending.pop_front();
        }
        if !rest.is_empty() {
            groups.push(rest);
        }
    }
    Index::from_groups(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containment::contains;
    use crate::parser::parse_index;

    fn ix(s: &str) -> Index {
        parse_index(s).unwrap()
    }

    #[test]
    fn contained_groups_become_the_prefix() {
        let b = constrain(&ix("{{g}}"), &ix("{{d,g,r}}"));
        assert_eq!(b.to_sorted_string(), "{{g}{d,r}}");

        let b = constrain(&ix("{{g}{d,r}}"), &ix("{{a,d,f,g,j,n,r,t,z}}"));
        assert_eq!(b.to_sorted_string(), "{{g}{d,r}{a,f,j,n,t,z}}");
    }

    #[test]
    fn tightening_spans_several_groups() {
        let b = constrain(&ix("{{2}{1}}"), &ix("{{1,2}{3}}"));
        assert_eq!(b.to_string(), "{{2}{1}{3}}");

        let b = constrain(&ix("{{1}{2}}"), &ix("{{1}{2,3}}"));
        assert_eq!(b.to_string(), "{{1}{2}{3}}");
    }

    #[test]
    fn equal_indexes_constrain_to_the_contained_order() {
        let b = constrain(&ix("{{b,a}}"), &ix("{{a,b}}"));
        assert_eq!(b.to_string(), "{{b,a}}");
    }

    #[test]
    fn result_keeps_length_and_still_contains() {
        let cases = [
            ("{{x}}", "{{x,y,z}}"),
            ("{{z,x}}", "{{x,y,z}}"),
            ("{{a,z}}", "{{a,d,f,g,j,n,r,t,z}}"),
            ("{{1}}", "{{1}{2,3}}"),
        ];
        for (c, b) in cases {
            let (c, b) = (ix(c), ix(b));
            assert!(contains(&c, &b));
            let tightened = constrain(&c, &b);
            assert_eq!(tightened.len(), b.len());
            assert!(contains(&c, &tightened));
        }
    }
}
