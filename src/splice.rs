// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The result splicer: fusing pinned documents into the organic ranking.
//!
//! This is the hot-path half of pinning. The engine hands over its
//! score-sorted organic list, the matcher says which rules fired, and this
//! module produces the final list under a strict positional contract: every
//! pin lands exactly where it was promised, or not at all. Organic results
//! that survive keep their relative order - pinning never reorders what the
//! ranker decided, it only threads promoted documents between them.
//!
//! # Conflict resolution: first wins
//!
//! Many rules can fire at once, and their promotions can fight over the same
//! slot or the same document. The policy is "first seen wins the position,
//! lowest requested position wins the document":
//!
//! - Promotions are walked in rule order, then declaration order. The first
//!   promotion to claim a position owns it; later claims are dropped.
//! - A later promotion of an **already-pinned document** may still rescue it
//!   to a smaller (better) slot, if that slot is free. It can never demote.
//!
//! Earlier rules and earlier promotions dominate, which makes outcomes
//! predictable from the rule list alone. Repeated queries always produce the
//! same arrangement.
//!
//! # Stale rules
//!
//! Rules outlive documents. A promotion referencing an id the engine cannot
//! resolve, or a document that has been deleted, is dropped silently - a
//! stale rule must not break search. Drops are logged at debug level.

use crate::store::PinningRules;
use crate::types::{DocId, PinRule, RankedHit};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Score assigned to a pinned document that was present in the organic list.
///
/// A sentinel far above any realistic organic score, minus the pin position
/// so that pinned entries themselves are score-ordered. Downstream stages
/// that re-sort by score therefore cannot displace a pin. If an embedder's
/// organic scores can approach this value, they must rescale upstream; the
/// splicer does not inspect organic scores.
pub const BASE_PIN_SCORE: f64 = 1_000_000.0;

/// Score assigned to a pinned document promoted from outside the result set.
///
/// The document never matched the query, so it carries no meaningful
/// relevance signal. Zero keeps it honest: anything downstream that reads
/// scores sees "placed by fiat, not by ranking".
pub const PROMOTED_SCORE: f64 = 0.0;

// =============================================================================
// ORACLE CAPABILITY
// =============================================================================

/// Narrow view of the engine's document store, as the splicer needs it.
///
/// Two synchronous map lookups, nothing more. The splicer never assumes a
/// concrete container; tests substitute a HashMap-backed fixture, the real
/// engine passes its id mapper and document table.
pub trait DocumentOracle {
    /// Translate an external document id into the engine's internal id.
    /// Returns `None` when the id was never inserted (or has been forgotten).
    fn internal_id(&self, external_id: &str) -> Option<DocId>;

    /// Does a document with this internal id currently exist?
    fn contains(&self, doc_id: DocId) -> bool;
}

// =============================================================================
// SPLICING
// =============================================================================

/// Apply matching pinning rules to an organic result list.
///
/// The data-plane entry point, called once per query after scoring and
/// deduplication but before pagination - pinned documents count toward the
/// first page. Takes one logical snapshot of the matched rule set up front
/// and never touches the store again.
///
/// When no rule matches, the organic list is returned unchanged (the same
/// allocation - the identity short-circuit is free).
pub fn apply_pinning_rules(
    oracle: &impl DocumentOracle,
    pins: &impl PinningRules,
    organic: Vec<RankedHit>,
    query: &str,
) -> Vec<RankedHit> {
    let matched = pins.matching_rules(query);
    if matched.is_empty() {
        return organic;
    }
    splice(oracle, &matched, organic)
}

/// Fuse the promotions of already-matched rules with the organic list.
fn splice(
    oracle: &impl DocumentOracle,
    matched: &[PinRule],
    organic: Vec<RankedHit>,
) -> Vec<RankedHit> {
    let placements = resolve_placements(oracle, matched);
    if placements.is_empty() {
        return organic;
    }

    let organic_ids: HashSet<DocId> = organic.iter().map(|hit| hit.doc_id).collect();

    // Score each placement, dropping pins whose document no longer exists.
    // Position conflicts were already settled; a drop here does not reopen
    // the slot for other promotions.
    let mut pins_by_position: BTreeMap<u32, RankedHit> = BTreeMap::new();
    for (position, doc_id) in placements {
        let score = if organic_ids.contains(&doc_id) {
            BASE_PIN_SCORE - f64::from(position)
        } else if oracle.contains(doc_id) {
            PROMOTED_SCORE
        } else {
            debug!(
                doc_id = doc_id.get(),
                position, "pinned document no longer exists, dropping pin"
            );
            continue;
        };
        pins_by_position.insert(position, RankedHit { doc_id, score });
    }
    if pins_by_position.is_empty() {
        return organic;
    }

    let pinned_ids: HashSet<DocId> = pins_by_position.values().map(|hit| hit.doc_id).collect();

    // Organic entries that were not pinned keep their relative order; pinned
    // ones reappear at their assigned slots instead.
    let mut unpinned = organic
        .iter()
        .filter(|hit| !pinned_ids.contains(&hit.doc_id))
        .copied();

    #[cfg(debug_assertions)]
    let debug_placements: Vec<(u32, DocId)> = pins_by_position
        .iter()
        .map(|(&position, hit)| (position, hit.doc_id))
        .collect();

    // Walk positions 0, 1, 2, ... emitting the pin that claims each slot,
    // otherwise the next unpinned organic entry. Stop when both run out;
    // pins aimed past the end are appended in ascending position order
    // (BTreeMap iteration order).
    let mut spliced = Vec::with_capacity(organic.len() + pins_by_position.len());
    loop {
        let position = spliced.len() as u32;
        if let Some(pin) = pins_by_position.remove(&position) {
            spliced.push(pin);
        } else if let Some(hit) = unpinned.next() {
            spliced.push(hit);
        } else {
            break;
        }
    }
    spliced.extend(pins_by_position.into_values());

    #[cfg(debug_assertions)]
    {
        crate::contracts::check_positions_honored(&debug_placements, &spliced);
        crate::contracts::check_no_duplicate_docs(&spliced);
        crate::contracts::check_organic_order_preserved(&organic, &pinned_ids, &spliced);
    }

    spliced
}

/// Resolve the flattened promotion sequence into position claims.
///
/// Walks promotions in rule order, then declaration order, applying the
/// first-wins policy. Returns the winning claims keyed by position, which is
/// both duplicate-free (positions were contested one at a time) and sorted
/// (BTreeMap), so every later stage is deterministic for free.
fn resolve_placements(
    oracle: &impl DocumentOracle,
    matched: &[PinRule],
) -> BTreeMap<u32, DocId> {
    let mut placed: HashMap<DocId, u32> = HashMap::new();
    let mut taken: HashSet<u32> = HashSet::new();

    for rule in matched {
        for promotion in rule.promotions() {
            let Some(doc_id) = oracle.internal_id(&promotion.doc_id) else {
                debug!(
                    rule_id = %rule.id,
                    doc_id = %promotion.doc_id,
                    "promotion references an unknown document, skipping"
                );
                continue;
            };
            let position = promotion.position;

            if let Some(&current) = placed.get(&doc_id) {
                // Already pinned. A later promotion may rescue the document
                // to a smaller slot, but only if that slot is free - a
                // failed upgrade never un-places the pin.
                if position < current && !taken.contains(&position) {
                    taken.remove(&current);
                    taken.insert(position);
                    placed.insert(doc_id, position);
                }
                continue;
            }

            if taken.contains(&position) {
                debug!(
                    rule_id = %rule.id,
                    doc_id = %promotion.doc_id,
                    position,
                    "position already claimed by an earlier promotion, skipping"
                );
                continue;
            }

            placed.insert(doc_id, position);
            taken.insert(position);
        }
    }

    placed
        .into_iter()
        .map(|(doc_id, position)| (position, doc_id))
        .collect()
}
