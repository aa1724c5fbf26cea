//! Ordered-set primitive tests, including the standard set-theoretic
//! identities over arbitrary inputs.

use relmat::sorted;
use std::cmp::Ordering;

#[test]
fn test_results_are_ascending_and_duplicate_free() {
    let a = [9, 1, 9, 4];
    let b = [4, 4, 0];
    for result in [
        sorted::union(&a, &b),
        sorted::intersect(&a, &b),
        sorted::difference(&a, &b),
        sorted::symmetric_difference(&a, &b),
    ] {
        assert!(result.windows(2).all(|w| w[0] < w[1]), "{result:?}");
    }
}

#[test]
fn test_set_identities() {
    let a = [3, 1, 4, 1, 5];
    let b = [2, 7, 1, 8];
    // A ^ B == (A | B) - (A & B)
    assert_eq!(
        sorted::symmetric_difference(&a, &b),
        sorted::difference(&sorted::union(&a, &b), &sorted::intersect(&a, &b))
    );
    // commutativity
    assert_eq!(sorted::union(&a, &b), sorted::union(&b, &a));
    assert_eq!(sorted::intersect(&a, &b), sorted::intersect(&b, &a));
    // A - A == {}
    assert!(sorted::difference(&a, &a).is_empty());
    // A & {} == {}
    assert!(sorted::intersect(&a, &[]).is_empty());
    // A | {} == sorted(A)
    assert_eq!(sorted::union(&a, &[]), vec![1, 3, 4, 5]);
}

#[test]
fn test_compare_over_pairs() {
    // also used for (type, id) pairs in the typed matrix
    let a = [(0usize, 3usize), (1, 0)];
    let b = [(0usize, 3usize), (1, 1)];
    assert_eq!(sorted::compare(&a, &b), Ordering::Less);
    assert_eq!(sorted::compare(&a, &a), Ordering::Equal);
}

#[test]
fn test_sort_unique() {
    let mut v = vec![5, 5, 5];
    sorted::sort_unique(&mut v);
    assert_eq!(v, vec![5]);

    let mut empty: Vec<u32> = vec![];
    sorted::sort_unique(&mut empty);
    assert!(empty.is_empty());
}
