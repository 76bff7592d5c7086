//! End-to-end scenarios: a store, an oracle, a query, an organic list.
//!
//! These mirror the situations rule authors actually hit - the empty store,
//! the contested slot, the promoted outsider, the stale rule - and assert
//! the exact final arrangement, scores included.

use crate::common::{contains_rule, ids, make_organic, standard_oracle, store_with};
use pinax::{
    apply_pinning_rules, delete_pin, insert_pin, update_pin, RankedHit, SharedPinStore,
    BASE_PIN_SCORE, PROMOTED_SCORE,
};

#[test]
fn test_empty_store_returns_organic_untouched() {
    let pins = SharedPinStore::new();
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic.clone(), "anything");

    assert_eq!(out, organic);
}

#[test]
fn test_contains_rule_promotes_organic_doc_to_top() {
    // Rule: contains "feat" -> promote b to slot 0. Query "featured".
    let pins = store_with(vec![contains_rule("r1", "feat", &[("b", 0)])]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic, "featured");

    assert_eq!(
        out,
        vec![
            RankedHit::new(2, BASE_PIN_SCORE),
            RankedHit::new(1, 9.0),
            RankedHit::new(3, 7.0),
        ]
    );
}

#[test]
fn test_two_rules_contesting_slot_zero_first_wins() {
    // r1 sorts before r2; both fire; b takes slot 0, c's promotion drops.
    let pins = store_with(vec![
        contains_rule("r1", "q", &[("b", 0)]),
        contains_rule("r2", "q", &[("c", 0)]),
    ]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic, "q");

    assert_eq!(ids(&out), vec![2, 1, 3]);
    assert_eq!(out[0].score, BASE_PIN_SCORE);
    assert_eq!(out[1].score, 9.0);
    assert_eq!(out[2].score, 7.0);
}

#[test]
fn test_outsider_promotion_lands_mid_list_with_zero_score() {
    // d exists in the engine but is not an organic result for "boost".
    let pins = store_with(vec![contains_rule("r1", "boost", &[("d", 2)])]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic, "boost");

    assert_eq!(
        out,
        vec![
            RankedHit::new(1, 9.0),
            RankedHit::new(2, 8.0),
            RankedHit::new(4, PROMOTED_SCORE),
            RankedHit::new(3, 7.0),
        ]
    );
}

#[test]
fn test_stale_rule_is_silently_ignored() {
    let pins = store_with(vec![contains_rule("r1", "q", &[("no-such-doc", 0)])]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic.clone(), "q");

    assert_eq!(out, organic);
}

#[test]
fn test_sparse_position_appends_at_tail() {
    // Slot 10 with only 3 organic results: the pin trails the list.
    let pins = store_with(vec![contains_rule("r1", "q", &[("j", 10)])]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic, "q");

    assert_eq!(ids(&out), vec![1, 2, 3, 10]);
}

#[test]
fn test_pins_count_toward_the_first_page() {
    // The splicer runs before pagination; a page of 3 must include the pin.
    let pins = store_with(vec![contains_rule("r1", "q", &[("e", 1)])]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0), (4, 6.0)]);

    let spliced = apply_pinning_rules(&standard_oracle(), &pins, organic, "q");
    let page: Vec<RankedHit> = spliced.into_iter().take(3).collect();

    assert_eq!(ids(&page), vec![1, 5, 2]);
}

#[test]
fn test_rule_lifecycle_changes_search_immediately() {
    let pins = SharedPinStore::new();
    let oracle = standard_oracle();
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0)]);

    // No rule yet: organic passes through.
    let out = apply_pinning_rules(&oracle, &pins, organic.clone(), "deals");
    assert_eq!(ids(&out), vec![1, 2, 3]);

    // Insert: c jumps to the top.
    insert_pin(&pins, contains_rule("seasonal", "deal", &[("c", 0)])).unwrap();
    let out = apply_pinning_rules(&oracle, &pins, organic.clone(), "deals");
    assert_eq!(ids(&out), vec![3, 1, 2]);

    // Update: the rule now promotes b instead.
    update_pin(&pins, contains_rule("seasonal", "deal", &[("b", 0)])).unwrap();
    let out = apply_pinning_rules(&oracle, &pins, organic.clone(), "deals");
    assert_eq!(ids(&out), vec![2, 1, 3]);

    // Delete: back to organic.
    assert!(delete_pin(&pins, "seasonal"));
    let out = apply_pinning_rules(&oracle, &pins, organic.clone(), "deals");
    assert_eq!(ids(&out), vec![1, 2, 3]);
}

#[test]
fn test_multi_condition_rule_fires_only_on_full_conjunction() {
    let pins = store_with(vec![pinax::testing::make_rule(
        "r1",
        vec![
            pinax::Condition::new(pinax::Anchoring::StartsWith, "how"),
            pinax::Condition::new(pinax::Anchoring::Contains, "pin"),
        ],
        &[("f", 0)],
    )]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0)]);

    let hit = apply_pinning_rules(&standard_oracle(), &pins, organic.clone(), "how do pins work");
    assert_eq!(ids(&hit), vec![6, 1, 2]);

    let miss = apply_pinning_rules(&standard_oracle(), &pins, organic.clone(), "how do results work");
    assert_eq!(miss, organic);
}

#[test]
fn test_complex_interleaving_all_mechanisms_at_once() {
    // Four rules fire together:
    //  - "alpha" pins organic doc c to slot 0 and outsider g to slot 3
    //  - "bravo" tries slot 0 (loses), then rescues its own doc to slot 1
    //  - "charlie" references a stale doc (dropped)
    //  - "delta" pins j to slot 20 (appended)
    let pins = store_with(vec![
        contains_rule("alpha", "q", &[("c", 0), ("g", 3)]),
        contains_rule("bravo", "q", &[("b", 0), ("b", 1)]),
        contains_rule("charlie", "q", &[("no-such-doc", 2)]),
        contains_rule("delta", "q", &[("j", 20)]),
    ]);
    let organic = make_organic(&[(1, 9.0), (2, 8.0), (3, 7.0), (4, 6.0)]);

    let out = apply_pinning_rules(&standard_oracle(), &pins, organic, "q");

    // c at 0; b lost slot 0 but its second promotion claims slot 1;
    // slot 2 falls to the first unpinned organic doc (a); g at 3; then d;
    // j appended last.
    assert_eq!(ids(&out), vec![3, 2, 1, 7, 4, 10]);
    assert_eq!(out[0].score, BASE_PIN_SCORE);
    assert_eq!(out[1].score, BASE_PIN_SCORE - 1.0);
    assert_eq!(out[3].score, PROMOTED_SCORE);
    assert_eq!(out[5].score, PROMOTED_SCORE);
}
