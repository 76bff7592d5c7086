// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Rule-to-query matching: which rules fire for this query?
//!
//! Deliberately the dumbest string matching that could work. The query is
//! compared against each pattern after lowercasing both sides, and that is
//! the entire normalization story - no tokenization, no stemming, no
//! diacritic stripping, no whitespace collapsing. Pinning conditions are
//! authored against what the user literally typed, and anything cleverer
//! makes rule behavior impossible to predict from the rule text.
//!
//! A rule fires iff **all** of its conditions hold (conjunction). Queries
//! that are empty or whitespace-only match nothing: pinning only applies to
//! explicit queries, so a browse-everything request stays organic.
//!
//! This module is pure. It reads the store, clones out the winners, and
//! mutates nothing.

use crate::store::PinStore;
use crate::types::{Anchoring, Condition, PinRule};

/// Lowercase a query for condition comparison.
///
/// Returns `None` for empty or whitespace-only queries - the caller should
/// treat those as "no rules match". The text is not trimmed: a trailing
/// space is part of what the user typed, and an `ends_with` pattern may
/// legitimately care.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Does one condition hold against an already-normalized query?
fn condition_holds(condition: &Condition, query: &str) -> bool {
    let pattern = condition.pattern.to_lowercase();
    match condition.anchoring {
        Anchoring::Is => query == pattern,
        Anchoring::StartsWith => query.starts_with(&pattern),
        Anchoring::EndsWith => query.ends_with(&pattern),
        Anchoring::Contains => query.contains(&pattern),
    }
}

/// Does a rule fire for an already-normalized query?
///
/// All conditions must hold. Stored rules have non-empty condition lists, so
/// the conjunction is never vacuously true for them.
pub(crate) fn rule_matches(rule: &PinRule, query: &str) -> bool {
    rule.conditions.iter().all(|c| condition_holds(c, query))
}

/// Rules whose conditions all match the query, in store iteration order.
///
/// The order is a tie-breaker only: the splicer's first-wins conflict policy
/// means earlier rules get first claim on contested positions, but each
/// rule's own promotions keep their declaration order regardless.
pub fn matching_rules(store: &PinStore, query: &str) -> Vec<PinRule> {
    let Some(query) = normalize_query(query) else {
        return Vec::new();
    };

    store
        .iter()
        .filter(|rule| rule_matches(rule, &query))
        .cloned()
        .collect()
}
