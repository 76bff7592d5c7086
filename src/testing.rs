//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::splice::DocumentOracle;
use crate::types::{Anchoring, Condition, Consequence, DocId, PinRule, Promotion, RankedHit};
use std::collections::{HashMap, HashSet};

/// Build a rule from explicit conditions and `(external_id, position)` pairs.
///
/// This is the canonical implementation used across all tests.
pub fn make_rule(id: &str, conditions: Vec<Condition>, promotions: &[(&str, u32)]) -> PinRule {
    PinRule {
        id: id.to_string(),
        conditions,
        consequence: Consequence {
            promote: promotions
                .iter()
                .map(|&(doc_id, position)| Promotion::new(doc_id, position))
                .collect(),
        },
    }
}

/// The most common rule shape: a single `contains` condition.
pub fn contains_rule(id: &str, pattern: &str, promotions: &[(&str, u32)]) -> PinRule {
    make_rule(
        id,
        vec![Condition::new(Anchoring::Contains, pattern)],
        promotions,
    )
}

/// Build an organic result list from `(internal_id, score)` pairs.
pub fn make_organic(hits: &[(u32, f64)]) -> Vec<RankedHit> {
    hits.iter()
        .map(|&(doc_id, score)| RankedHit::new(doc_id, score))
        .collect()
}

/// HashMap-backed stand-in for the engine's id mapper and document table.
///
/// `insert` registers both the external-to-internal mapping and the
/// document's existence. `delete_doc` removes only the existence, leaving a
/// stale mapping behind - exactly the state a deleted document leaves in a
/// real engine, and what a stale pin trips over.
#[derive(Debug, Clone, Default)]
pub struct FixtureOracle {
    ids: HashMap<String, DocId>,
    docs: HashSet<DocId>,
}

impl FixtureOracle {
    pub fn new() -> Self {
        FixtureOracle::default()
    }

    /// Register a document: external id mapping plus existence.
    pub fn insert(&mut self, external_id: &str, internal_id: u32) {
        let doc_id = DocId(internal_id);
        self.ids.insert(external_id.to_string(), doc_id);
        self.docs.insert(doc_id);
    }

    /// Delete a document but keep its id mapping, simulating a stale rule's
    /// view of the world.
    pub fn delete_doc(&mut self, doc_id: DocId) {
        self.docs.remove(&doc_id);
    }
}

impl DocumentOracle for FixtureOracle {
    fn internal_id(&self, external_id: &str) -> Option<DocId> {
        self.ids.get(external_id).copied()
    }

    fn contains(&self, doc_id: DocId) -> bool {
        self.docs.contains(&doc_id)
    }
}
