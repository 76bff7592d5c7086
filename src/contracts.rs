//! Runtime contracts for the splicer's output invariants.
//!
//! These are debug-mode assertions, zero-cost in release builds. The splicer
//! calls them on every result it is about to return, so any violation of the
//! positional contract surfaces immediately during development instead of as
//! a mysteriously reordered result page in production.
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function                | Guarantee                                   |
//! |----------------------------------|---------------------------------------------|
//! | `check_positions_honored`        | Every in-range pin sits at its claimed slot |
//! | `check_no_duplicate_docs`        | No document appears twice in the output     |
//! | `check_organic_order_preserved`  | Unpinned entries keep their organic order   |
//!
//! The checks are also reusable from tests, where they run in debug builds
//! as hard assertions.

use crate::types::{DocId, RankedHit};
use std::collections::HashSet;

/// Check that every pin with an in-range claimed position occupies it.
///
/// Pins whose position is beyond the output length were appended at the
/// tail; their slot promise is unsatisfiable and exempt by contract.
///
/// # Panics (debug builds only)
/// Panics if `results[position]` is not the pinned document.
#[inline]
pub fn check_positions_honored(placements: &[(u32, DocId)], results: &[RankedHit]) {
    for &(position, doc_id) in placements {
        let position = position as usize;
        if position < results.len() {
            debug_assert!(
                results[position].doc_id == doc_id,
                "Contract violation: pin for doc {} claimed position {} but results[{}] is doc {}",
                doc_id.get(),
                position,
                position,
                results[position].doc_id.get()
            );
        }
    }
}

/// Check that no document appears more than once.
///
/// # Panics (debug builds only)
/// Panics on the first duplicated internal id.
#[inline]
pub fn check_no_duplicate_docs(results: &[RankedHit]) {
    let mut seen = HashSet::with_capacity(results.len());
    for (index, hit) in results.iter().enumerate() {
        debug_assert!(
            seen.insert(hit.doc_id),
            "Contract violation: doc {} appears twice, second time at index {}",
            hit.doc_id.get(),
            index
        );
    }
}

/// Check that unpinned organic entries keep their relative order.
///
/// The organic list restricted to unpinned documents must reappear in the
/// output as the exact same subsequence - pinning threads documents between
/// organic results but never reorders them.
///
/// # Panics (debug builds only)
/// Panics if the unpinned subsequences diverge.
#[inline]
pub fn check_organic_order_preserved(
    organic: &[RankedHit],
    pinned: &HashSet<DocId>,
    results: &[RankedHit],
) {
    let organic_unpinned: Vec<DocId> = organic
        .iter()
        .map(|hit| hit.doc_id)
        .filter(|doc_id| !pinned.contains(doc_id))
        .collect();
    let result_unpinned: Vec<DocId> = results
        .iter()
        .map(|hit| hit.doc_id)
        .filter(|doc_id| !pinned.contains(doc_id))
        .collect();

    debug_assert!(
        organic_unpinned == result_unpinned,
        "Contract violation: unpinned organic order changed: {:?} vs {:?}",
        organic_unpinned,
        result_unpinned
    );
}
