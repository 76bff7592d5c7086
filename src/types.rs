// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the pinning subsystem.
//!
//! These types define how rules, conditions, and promotions fit together, and
//! what a ranked result looks like on its way through the splicer. The wire
//! shape mirrors what rule authors write in JSON:
//!
//! ```json
//! { "id": "promote-sale-banner",
//!   "conditions": [ { "anchoring": "contains", "pattern": "sale" } ],
//!   "consequence": { "promote": [ { "doc_id": "banner-2024", "position": 0 } ] } }
//! ```
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **PinRule**: `conditions` and `consequence.promote` are non-empty, and
//!   every promotion within one rule claims a distinct position. The store
//!   rejects violations at insert/update; nothing downstream re-checks.
//!
//! - **Condition**: `pattern` is non-blank. A blank pattern would match every
//!   query under `contains`, which is never what the author meant.
//!
//! Positions are arbitrary non-negative integers. Gaps are fine - a rule may
//! promote to slot 0 and slot 10 with nothing in between; the splicer
//! compacts around the holes.

use serde::{Deserialize, Serialize};

// =============================================================================
// NEWTYPES: Type-safe identifiers
// =============================================================================

/// Type-safe internal document identifier.
///
/// The engine assigns these at insertion time; rule authors never see them.
/// Rules reference documents by their external (user-supplied) string id, and
/// the splicer translates through the engine's id mapper. Keeping the newtype
/// prevents accidentally mixing internal ids with positions, which are also
/// small integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl From<DocId> for usize {
    fn from(id: DocId) -> Self {
        id.0 as usize
    }
}

// =============================================================================
// RULE TYPES
// =============================================================================

/// String-match mode for a condition, compared against the raw query text.
///
/// Matching is case-insensitive and untokenized: the query is one string, the
/// pattern is one string, and the anchoring decides how they line up. No
/// stemming, no whitespace games - rule authors get exactly what they typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchoring {
    /// Query equals the pattern exactly.
    Is,
    /// Query begins with the pattern.
    StartsWith,
    /// Query ends with the pattern.
    EndsWith,
    /// Pattern appears anywhere in the query.
    Contains,
}

/// A single match requirement on the query text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub anchoring: Anchoring,
    pub pattern: String,
}

impl Condition {
    /// Convenience constructor for the common literal case.
    pub fn new(anchoring: Anchoring, pattern: impl Into<String>) -> Self {
        Condition {
            anchoring,
            pattern: pattern.into(),
        }
    }
}

/// A directive to place one document at one slot in the final list.
///
/// `doc_id` is the **external** identifier, as supplied when the document was
/// inserted into the engine. `position` is the zero-indexed slot the document
/// must occupy if possible. Rules outlive documents, so a promotion may point
/// at a document that no longer exists - the splicer drops those silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub doc_id: String,
    pub position: u32,
}

impl Promotion {
    pub fn new(doc_id: impl Into<String>, position: u32) -> Self {
        Promotion {
            doc_id: doc_id.into(),
            position,
        }
    }
}

/// What happens when a rule fires.
///
/// Only promotion is supported. The nesting looks redundant with one field,
/// but it keeps the wire shape open for future consequence kinds without
/// breaking stored rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequence {
    pub promote: Vec<Promotion>,
}

/// The user-visible configuration unit: a conditional bundle of promotions.
///
/// All conditions must match for the rule to fire (conjunction). Rule ids are
/// globally unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRule {
    pub id: String,
    pub conditions: Vec<Condition>,
    pub consequence: Consequence,
}

impl PinRule {
    /// Iterate the rule's promotions in declaration order.
    pub fn promotions(&self) -> impl Iterator<Item = &Promotion> {
        self.consequence.promote.iter()
    }
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// One entry of a ranked result list, organic or spliced.
///
/// The ranker produces these sorted by score (highest first); the splicer
/// consumes and re-emits them. Pinned entries carry sentinel scores (see
/// `BASE_PIN_SCORE`) so that downstream sorting by score, if any, cannot
/// displace them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub doc_id: DocId,
    pub score: f64,
}

impl RankedHit {
    pub fn new(doc_id: impl Into<DocId>, score: f64) -> Self {
        RankedHit {
            doc_id: doc_id.into(),
            score,
        }
    }
}
