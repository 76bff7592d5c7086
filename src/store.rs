// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The pinning rule store: control-plane CRUD over `PinRule`s.
//!
//! Two layers live here. `PinStore` is the plain container - a `BTreeMap`
//! from rule id to rule, validated on every insert and update, with no
//! opinion about threading. `SharedPinStore` wraps it for the deployment
//! shape the search engine actually has: one control-plane writer mutating
//! rules, many search-path readers consulting them concurrently. Readers
//! never observe a torn rule; the lock is held only for the map operation
//! itself.
//!
//! `BTreeMap` rather than `HashMap` so that iteration (and therefore matcher
//! output and splice outcomes) is reproducible across runs. Rule ids sort
//! lexicographically, which also gives authors a predictable knob: when two
//! rules fight over a position, the one with the smaller id is evaluated
//! first.
//!
//! # Invariants
//!
//! - Rule ids are unique. Inserting a colliding id fails with
//!   `DuplicateRuleId` and leaves the store untouched.
//! - Every stored rule is structurally valid: non-empty conditions, non-empty
//!   promotions, non-blank patterns, distinct positions within the rule.
//!   Validation failures are atomic - the store never holds a half-checked
//!   rule.

use crate::matcher;
use crate::types::{PinRule, Promotion};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// ERRORS
// =============================================================================

/// Why a rule failed structural validation.
///
/// Carried inside [`RuleError::InvalidRule`] so callers can point authors at
/// the offending field rather than a generic "invalid rule".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRuleReason {
    /// `conditions` is empty - the rule could never fire.
    EmptyConditions,
    /// `consequence.promote` is empty - the rule would fire and do nothing.
    EmptyPromotions,
    /// A condition pattern is empty or whitespace-only.
    BlankPattern { index: usize },
    /// Two promotions within the rule claim the same position.
    DuplicatePosition { position: u32 },
}

/// Error type for control-plane store operations.
///
/// Data-plane anomalies (stale document references, position conflicts) are
/// deliberately *not* here - the splicer absorbs those. Only rule authoring
/// mistakes surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule with this id already exists in the store.
    DuplicateRuleId { id: String },
    /// No rule with this id exists in the store.
    RuleNotFound { id: String },
    /// The rule failed structural validation.
    InvalidRule {
        id: String,
        reason: InvalidRuleReason,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::DuplicateRuleId { id } => {
                write!(f, "pin rule '{}' already exists", id)
            }
            RuleError::RuleNotFound { id } => {
                write!(f, "pin rule '{}' not found", id)
            }
            RuleError::InvalidRule { id, reason } => match reason {
                InvalidRuleReason::EmptyConditions => {
                    write!(f, "pin rule '{}' has no conditions", id)
                }
                InvalidRuleReason::EmptyPromotions => {
                    write!(f, "pin rule '{}' promotes no documents", id)
                }
                InvalidRuleReason::BlankPattern { index } => {
                    write!(f, "pin rule '{}' condition {} has a blank pattern", id, index)
                }
                InvalidRuleReason::DuplicatePosition { position } => {
                    write!(
                        f,
                        "pin rule '{}' promotes two documents to position {}",
                        id, position
                    )
                }
            },
        }
    }
}

impl std::error::Error for RuleError {}

/// Check the structural invariants a stored rule must satisfy.
///
/// Runs before any mutation so a failed insert/update is atomic.
fn validate(rule: &PinRule) -> Result<(), RuleError> {
    if rule.conditions.is_empty() {
        return Err(RuleError::InvalidRule {
            id: rule.id.clone(),
            reason: InvalidRuleReason::EmptyConditions,
        });
    }

    for (index, condition) in rule.conditions.iter().enumerate() {
        if condition.pattern.trim().is_empty() {
            return Err(RuleError::InvalidRule {
                id: rule.id.clone(),
                reason: InvalidRuleReason::BlankPattern { index },
            });
        }
    }

    if rule.consequence.promote.is_empty() {
        return Err(RuleError::InvalidRule {
            id: rule.id.clone(),
            reason: InvalidRuleReason::EmptyPromotions,
        });
    }

    let mut positions = HashSet::with_capacity(rule.consequence.promote.len());
    for Promotion { position, .. } in &rule.consequence.promote {
        if !positions.insert(*position) {
            return Err(RuleError::InvalidRule {
                id: rule.id.clone(),
                reason: InvalidRuleReason::DuplicatePosition {
                    position: *position,
                },
            });
        }
    }

    Ok(())
}

// =============================================================================
// PLAIN STORE
// =============================================================================

/// In-memory container of pinning rules, keyed by rule id.
///
/// Lives for the engine process; persistence is the embedder's problem (the
/// store is rebuilt from external storage on load via repeated `add_rule`).
#[derive(Debug, Clone, Default)]
pub struct PinStore {
    rules: BTreeMap<String, PinRule>,
}

impl PinStore {
    pub fn new() -> Self {
        PinStore {
            rules: BTreeMap::new(),
        }
    }

    /// Number of rules in the store.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Insert a new rule.
    ///
    /// Fails with `DuplicateRuleId` if the id is taken, or `InvalidRule` if
    /// the rule is structurally malformed. The store is unchanged on failure.
    pub fn add_rule(&mut self, rule: PinRule) -> Result<(), RuleError> {
        validate(&rule)?;
        if self.rules.contains_key(&rule.id) {
            return Err(RuleError::DuplicateRuleId {
                id: rule.id.clone(),
            });
        }
        debug!(rule_id = %rule.id, "pin rule added");
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Replace an existing rule wholesale.
    ///
    /// Fails with `RuleNotFound` if the id is absent. Same validation as
    /// `add_rule`; the previous rule survives a failed update.
    pub fn update_rule(&mut self, rule: PinRule) -> Result<(), RuleError> {
        validate(&rule)?;
        if !self.rules.contains_key(&rule.id) {
            return Err(RuleError::RuleNotFound {
                id: rule.id.clone(),
            });
        }
        debug!(rule_id = %rule.id, "pin rule updated");
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Remove a rule by id. Returns whether anything was removed.
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let removed = self.rules.remove(id).is_some();
        if removed {
            debug!(rule_id = %id, "pin rule removed");
        }
        removed
    }

    /// Look up a rule by id.
    pub fn get_rule(&self, id: &str) -> Option<&PinRule> {
        self.rules.get(id)
    }

    /// All rules, in iteration order (ascending rule id).
    pub fn all_rules(&self) -> Vec<PinRule> {
        self.rules.values().cloned().collect()
    }

    /// Iterate rules without cloning, in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &PinRule> {
        self.rules.values()
    }

    /// Rules whose conditions all match the query, in iteration order.
    pub fn matching_rules(&self, query: &str) -> Vec<PinRule> {
        matcher::matching_rules(self, query)
    }
}

// =============================================================================
// CAPABILITY TRAIT + SHARED STORE
// =============================================================================

/// The pinning capability a search engine carries as a fixed field.
///
/// Mutators take `&self`: the implementor owns its interior synchronization,
/// and the capability object is handed out by shared reference to both the
/// control plane and the search path.
pub trait PinningRules {
    fn add_rule(&self, rule: PinRule) -> Result<(), RuleError>;
    fn update_rule(&self, rule: PinRule) -> Result<(), RuleError>;
    fn remove_rule(&self, id: &str) -> bool;
    fn get_rule(&self, id: &str) -> Option<PinRule>;
    fn all_rules(&self) -> Vec<PinRule>;
    fn matching_rules(&self, query: &str) -> Vec<PinRule>;
}

/// Thread-safe handle to a `PinStore`: one writer, many readers.
///
/// Clone freely - clones share the same underlying store. Writes take the
/// lock exclusively for the duration of one map operation; reads clone the
/// data they need out under a briefly-held read lock, so the search path
/// works on a consistent snapshot and never holds the lock across scoring or
/// splicing.
#[derive(Debug, Clone, Default)]
pub struct SharedPinStore {
    inner: Arc<RwLock<PinStore>>,
}

impl SharedPinStore {
    pub fn new() -> Self {
        SharedPinStore {
            inner: Arc::new(RwLock::new(PinStore::new())),
        }
    }

    /// Wrap an already-populated store (e.g. rebuilt from external storage).
    pub fn from_store(store: PinStore) -> Self {
        SharedPinStore {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Number of rules currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// A point-in-time copy of every rule, for persistence layers that dump
    /// the rule set wholesale.
    pub fn snapshot(&self) -> Vec<PinRule> {
        self.inner.read().all_rules()
    }
}

impl PinningRules for SharedPinStore {
    fn add_rule(&self, rule: PinRule) -> Result<(), RuleError> {
        self.inner.write().add_rule(rule)
    }

    fn update_rule(&self, rule: PinRule) -> Result<(), RuleError> {
        self.inner.write().update_rule(rule)
    }

    fn remove_rule(&self, id: &str) -> bool {
        self.inner.write().remove_rule(id)
    }

    fn get_rule(&self, id: &str) -> Option<PinRule> {
        self.inner.read().get_rule(id).cloned()
    }

    fn all_rules(&self) -> Vec<PinRule> {
        self.inner.read().all_rules()
    }

    fn matching_rules(&self, query: &str) -> Vec<PinRule> {
        self.inner.read().matching_rules(query)
    }
}

// =============================================================================
// CONTROL-PLANE API
// =============================================================================

/// Insert a new pinning rule. See [`PinStore::add_rule`] for failure modes.
pub fn insert_pin(pins: &impl PinningRules, rule: PinRule) -> Result<(), RuleError> {
    pins.add_rule(rule)
}

/// Replace an existing pinning rule by id.
pub fn update_pin(pins: &impl PinningRules, rule: PinRule) -> Result<(), RuleError> {
    pins.update_rule(rule)
}

/// Delete a pinning rule. Returns whether a rule was removed.
pub fn delete_pin(pins: &impl PinningRules, rule_id: &str) -> bool {
    pins.remove_rule(rule_id)
}

/// Fetch a pinning rule by id.
pub fn get_pin(pins: &impl PinningRules, rule_id: &str) -> Option<PinRule> {
    pins.get_rule(rule_id)
}

/// Fetch every pinning rule.
pub fn get_all_pins(pins: &impl PinningRules) -> Vec<PinRule> {
    pins.all_rules()
}
