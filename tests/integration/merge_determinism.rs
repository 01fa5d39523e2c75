//! Property-based tests for merge determinism

use amalgam::{compute_digest, merge, ConfigTree, SourceDocument};
use proptest::prelude::*;

fn source_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(
        "[a-z]{1,6}",
        (
            "[a-c]",
            prop_oneof![
                any::<i64>().prop_map(|n| n.to_string()),
                "[a-z]{0,8}".prop_map(|s| format!("\"{}\"", s)),
                Just("[1, 2]".to_string()),
                Just("null".to_string()),
            ],
        ),
        1..6,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, (key, value))| {
                (id, format!(r#"{{"options": {{"{}": {}}}, "{}": true}}"#, key, value, key))
            })
            .collect()
    })
}

fn documents(pairs: &[(String, String)]) -> Vec<SourceDocument> {
    pairs
        .iter()
        .map(|(id, body)| SourceDocument::new(id.clone(), body.clone()))
        .collect()
}

proptest! {
    #[test]
    fn test_merge_ignores_input_order(pairs in source_strategy(), rotate in 0usize..6) {
        let forward = documents(&pairs);
        let mut shuffled = forward.clone();
        shuffled.reverse();
        let len = shuffled.len();
        shuffled.rotate_left(rotate % len);

        let a = merge(&ConfigTree::empty(), forward);
        let b = merge(&ConfigTree::empty(), shuffled);
        prop_assert_eq!(&a.tree, &b.tree);
        prop_assert_eq!(compute_digest(&a.tree).unwrap(), compute_digest(&b.tree).unwrap());
        prop_assert_eq!(a.applied, b.applied);
    }

    #[test]
    fn test_remerge_is_idempotent(pairs in source_strategy()) {
        let once = merge(&ConfigTree::empty(), documents(&pairs));
        let twice = merge(&once.tree, documents(&pairs));
        prop_assert_eq!(compute_digest(&once.tree).unwrap(), compute_digest(&twice.tree).unwrap());
    }
}

#[test]
fn test_digest_is_stable_across_key_order() {
    let a = merge(
        &ConfigTree::empty(),
        vec![SourceDocument::new("x", r#"{"b": 1, "a": {"d": 2, "c": 3}}"#)],
    );
    let b = merge(
        &ConfigTree::empty(),
        vec![SourceDocument::new("x", r#"{"a": {"c": 3, "d": 2}, "b": 1}"#)],
    );
    assert_eq!(
        compute_digest(&a.tree).unwrap(),
        compute_digest(&b.tree).unwrap()
    );
}
