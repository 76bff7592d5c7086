//! Rule-based result pinning for full-text search.
//!
//! This crate promotes specific documents to specific positions in a ranked
//! result list when the query matches configured conditions. It sits between
//! a search engine's ranker and its pagination: organic results go in, the
//! final fused list comes out, and the ranker's own ordering is never
//! perturbed - pinning threads documents between organic results, it does
//! not re-score them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  store.rs   │────▶│  matcher.rs  │────▶│  splice.rs   │
//! │ (PinStore,  │     │ (matching_   │     │ (apply_      │
//! │  rule CRUD) │     │  rules)      │     │  pinning_    │
//! └─────────────┘     └──────────────┘     │  rules)      │
//!        │                    │            └──────────────┘
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                    contracts.rs                      │
//! │  (positions honored, no duplicates, organic order   │
//! │   preserved - debug-build output checks)            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The store is control-plane: rules are added, replaced, and removed by an
//! administrator, validated on every write. The matcher and splicer are
//! data-plane: consulted once per query, pure, and infallible - a stale rule
//! or a position conflict degrades to "that pin is dropped", never to an
//! error surfaced mid-search.
//!
//! # Usage
//!
//! ```ignore
//! use pinax::{apply_pinning_rules, insert_pin, Anchoring, Condition,
//!             Consequence, PinRule, Promotion, SharedPinStore};
//!
//! let pins = SharedPinStore::new();
//! insert_pin(&pins, PinRule {
//!     id: "promote-sale-banner".into(),
//!     conditions: vec![Condition::new(Anchoring::Contains, "sale")],
//!     consequence: Consequence {
//!         promote: vec![Promotion::new("banner-2024", 0)],
//!     },
//! })?;
//!
//! // In the search pipeline, after scoring and dedup, before pagination:
//! let results = apply_pinning_rules(&engine, &pins, organic, query);
//! ```
//!
//! The engine parameter is anything implementing [`DocumentOracle`] - two
//! synchronous lookups translating external document ids and checking
//! existence. The splicer needs nothing else from the engine.

// Module declarations
pub mod contracts;
mod matcher;
mod splice;
mod store;
#[doc(hidden)]
pub mod testing;
mod types;

// Re-exports for public API
pub use matcher::{matching_rules, normalize_query};
pub use splice::{apply_pinning_rules, DocumentOracle, BASE_PIN_SCORE, PROMOTED_SCORE};
pub use store::{
    delete_pin, get_all_pins, get_pin, insert_pin, update_pin, InvalidRuleReason, PinStore,
    PinningRules, RuleError, SharedPinStore,
};
pub use types::{Anchoring, Condition, Consequence, DocId, PinRule, Promotion, RankedHit};
