use std::collections::HashSet;

use diagnostics::error_pairs::distinct_mismatches;
use diagnostics::matrix::partition_order;
use diagnostics::ErrorPair;
use proptest::prelude::*;

fn label() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C"]).prop_map(str::to_string)
}

fn rows() -> impl Strategy<Value = Vec<Option<(String, String)>>> {
    prop::collection::vec(prop::option::weighted(0.9, (label(), label())), 0..40)
}

proptest! {
    #[test]
    fn mismatches_are_distinct_and_wrong(rows in rows()) {
        let pairs = distinct_mismatches(rows.clone());
        let mut seen = HashSet::new();
        for pair in &pairs {
            prop_assert_ne!(&pair.actual, &pair.predicted);
            prop_assert!(seen.insert(pair.clone()));
        }
        let expected: HashSet<ErrorPair> = rows
            .iter()
            .flatten()
            .filter(|(a, p)| a != p)
            .map(|(a, p)| ErrorPair::new(a.as_str(), p.as_str()))
            .collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn partition_is_stable_permutation(rows in rows(), actual in label(), predicted in label()) {
        let pair = ErrorPair::new(actual, predicted);
        let order = partition_order(&rows, &pair);
        prop_assert_eq!(order.len(), rows.len());

        let is_match = |i: usize| matches!(&rows[i], Some((a, p)) if pair.matches(a, p));
        let matching = rows.iter().enumerate().filter(|&(i, _)| is_match(i)).count();
        let (head, tail) = order.split_at(matching);
        prop_assert!(head.iter().all(|&i| is_match(i as usize)));
        prop_assert!(tail.iter().all(|&i| !is_match(i as usize)));
        prop_assert!(head.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(tail.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn first_occurrence_order() {
    let row = |a: &str, p: &str| Some((a.to_string(), p.to_string()));
    let rows = vec![row("A", "A"), row("A", "B"), row("B", "A"), row("A", "B")];
    assert_eq!(
        distinct_mismatches(rows),
        vec![ErrorPair::new("A", "B"), ErrorPair::new("B", "A")]
    );
}
