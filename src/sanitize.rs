//! Input clean-up before a search.

use crate::field::Field;
use crate::index::Index;
use std::collections::HashSet;

/// Normalizes raw input indexes.
///
/// Empty groups are dropped, then indexes left without groups. With
/// `remove_duplicate_fields`, a field that already appeared earlier in the
/// same index (in an earlier group or earlier in its own group) is removed
/// first, which may itself leave groups empty.
pub fn sanitize_indexes(indexes: &[Index], remove_duplicate_fields: bool) -> Vec<Index> {
    indexes
        .iter()
        .filter_map(|index| {
            let mut index = index.clone();
            if remove_duplicate_fields {
                drop_repeated_fields(&mut index);
            }
            index.groups_mut().retain(|group| !group.is_empty());
            (index.group_count() > 0).then_some(index)
        })
        .collect()
}

fn drop_repeated_fields(index: &mut Index) {
    let mut seen: HashSet<Field> = HashSet::new();
    for group in index.groups_mut().iter_mut() {
        group.retain(|field| seen.insert(field.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_index_list;

    fn printed(indexes: &[Index]) -> Vec<String> {
        indexes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_groups_and_indexes_go() {
        let raw = parse_index_list("{{}{a,b}}, {{b}{a}{}}, {{}{}}, {}").unwrap();
        assert_eq!(printed(&sanitize_indexes(&raw, false)), ["{{a,b}}", "{{b}{a}}"]);
    }

    #[test]
    fn duplicates_kept_unless_requested() {
        let raw = parse_index_list("{{a,b,a}{b}{c}}").unwrap();
        assert_eq!(printed(&sanitize_indexes(&raw, false)), ["{{a,b,a}{b}{c}}"]);
        assert_eq!(printed(&sanitize_indexes(&raw, true)), ["{{a,b}{c}}"]);
    }
}
