//! Containment predicates between indexes.
//!
//! [`contains`] is the walking predicate that drives the search: it decides
//! whether index `A` can be served by a prefix of index `B` when fields may be
//! permuted inside a group but groups may not be reordered.
//!
//! [`covers`] is the looser merge predicate used for coverage reports: it
//! also accepts a group of `A` that spans several consecutive groups of `B`
//! (`{{a,b,c}}` is covered by `{{a}{b}{c}}` but not contained in it).

use crate::field::Field;
use crate::index::Index;

/// Walking containment test.
///
/// Walk `a`'s groups in order against a cursor on `b`'s groups. Every field
/// of `a`'s current group must lie in `b`'s current group; once the number of
/// matched fields reaches the size of `b`'s current group, the cursor moves to
/// `b`'s next group. Fails as soon as a field is missing or `b` runs out of
/// groups while `a` still has some.
///
/// Reflexive; not transitive in general.
pub fn contains(a: &Index, b: &Index) -> bool {
    let b_groups = b.groups();
    let mut j = 0;
    let mut matched = 0;
    for group in a.groups() {
        let Some(target) = b_groups.get(j) else {
            return false;
        };
        for field in group {
            if target.contains(field) {
                matched += 1;
            } else {
                return false;
            }
        }
        if matched == target.len() {
            matched = 0;
            j += 1;
        }
    }
    true
}

/// Merge coverage test: can `b` serve every query `a` serves?
///
/// Both indexes are consumed group by group. The smaller remaining head must
/// be a subset of the larger one and is stripped from it; whichever side is
/// exhausted advances. `a` is covered when all of its groups are consumed.
pub fn covers(a: &Index, b: &Index) -> bool {
    let a_groups = a.groups();
    let b_groups = b.groups();
    if a_groups.is_empty() {
        return true;
    }
    if b_groups.is_empty() {
        return false;
    }

    let mut ai = 0;
    let mut bi = 0;
    let mut ra: Vec<&Field> = a_groups[0].iter().collect();
    let mut rb: Vec<&Field> = b_groups[0].iter().collect();
    loop {
        if ra.len() <= rb.len() {
            if !ra.iter().all(|f| rb.contains(f)) {
                return false;
            }
            rb.retain(|f| !ra.contains(f));
            ai += 1;
            if ai == a_groups.len() {
                return true;
            }
            ra = a_groups[ai].iter().collect();
            if rb.is_empty() {
                bi += 1;
                if bi == b_groups.len() {
                    return false;
                }
                rb = b_groups[bi].iter().collect();
            }
        } else {
            if !rb.iter().all(|f| ra.contains(f)) {
                return false;
            }
            ra.retain(|f| !rb.contains(f));
            bi += 1;
            if bi == b_groups.len() {
                return false;
            }
            rb = b_groups[bi].iter().collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_index;

    fn ix(s: &str) -> Index {
        parse_index(s).unwrap()
    }

    #[test]
    fn contains_is_reflexive_and_permutation_free() {
        assert!(contains(&ix("{{a,b}}"), &ix("{{a,b}}")));
        assert!(contains(&ix("{{a,b}}"), &ix("{{b,a}}")));
        assert!(contains(&ix("{{x}{y,z}}"), &ix("{{x}{z,y}}")));
    }

    #[test]
    fn contains_accepts_prefix_subsets() {
        assert!(contains(&ix("{{a,z}}"), &ix("{{a,d,f,g,j,n,r,t,z}}")));
        assert!(contains(&ix("{{g}}"), &ix("{{d,g,r}}")));
        assert!(contains(&ix("{{1}{2}}"), &ix("{{1}{2,3}}")));
        assert!(contains(&ix("{{2}{1}}"), &ix("{{1,2}{3}}")));
    }

    #[test]
    fn contains_rejects_group_reordering() {
        assert!(!contains(&ix("{{a}{b}}"), &ix("{{b}{a}}")));
        assert!(!contains(&ix("{{a,c}}"), &ix("{{a}{b}{c}}")));
        assert!(!contains(&ix("{{a,b}}"), &ix("{{a}{b}}")));
        assert!(!contains(&ix("{{a,b,c}}"), &ix("{{a,b}}")));
        assert!(!contains(&ix("{{b,r}}"), &ix("{{a,d,f,g,j,n,r,t,z}}")));
    }

    #[test]
    fn contains_needs_groups_left_in_target() {
        // `{a}` exhausts the first group; `{b}` must then find a second one.
        assert!(!contains(&ix("{{a}{b}}"), &ix("{{a}}")));
        assert!(contains(&ix("{{a}{b}}"), &ix("{{a}{b,c}}")));
    }

    #[test]
    fn covers_is_looser_than_contains() {
        let a = ix("{{a,b,c}}");
        let b = ix("{{a}{b}{c}}");
        assert!(!contains(&a, &b));
        assert!(covers(&a, &b));
        assert!(covers(&ix("{{1,2,0}}"), &ix("{{0,1}{2}}")));
    }

    #[test]
    fn covers_rejects_missing_or_misordered_fields() {
        assert!(!covers(&ix("{{0,2}{4,5}{6}}"), &ix("{{0,2}}")));
        assert!(!covers(&ix("{{3}{0,1}}"), &ix("{{0,1}{2}}")));
        assert!(!covers(&ix("{{a}{b}}"), &ix("{{b}{a}}")));
        assert!(!covers(&ix("{{a}}"), &Index::new()));
        assert!(covers(&Index::new(), &ix("{{a}}")));
    }

    #[test]
    fn contains_implies_covers() {
        let pairs = [
            ("{{a,z}}", "{{a,d,f,g,j,n,r,t,z}}"),
            ("{{x}{z}}", "{{x}{y,z}}"),
            ("{{2}{1}}", "{{1,2}{3}}"),
        ];
        for (a, b) in pairs {
            assert!(contains(&ix(a), &ix(b)));
            assert!(covers(&ix(a), &ix(b)), "{a} should be covered by {b}");
        }
    }
}
