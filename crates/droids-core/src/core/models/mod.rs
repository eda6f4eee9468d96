//! # Core Models Module
//!
//! This module contains the data structures that describe a comparative dynamics run in
//! DROIDS++: which simulated state and sampling scope a value came from, what a site's
//! residue is, the derived feature values, and the per-site result records.
//!
//! ## Overview
//!
//! The models are deliberately small value types. They are:
//!
//! - **Keyed** - every derived value is addressable by its (state, scope) pair
//! - **Immutable once produced** - result records are assembled once and never mutated
//! - **Self-describing** - states, scopes and labels render to the exact tokens used in
//!   file names and output tables
//!
//! ## Key Components
//!
//! - [`residue`] - Residue type codes, including histidine protonation variants
//! - [`state`] - Simulated states (reference, query, reference-control) and sampling scopes
//! - [`features`] - Fluctuation series, reduced feature sets and the keyed feature store
//! - [`records`] - Per-site divergence and discrepancy records with significance labels
//!
//! ## Usage
//!
//! ```ignore
//! use droidspp::core::models::state::{FeatureKey, Scope, State};
//!
//! let key = FeatureKey::new(State::Query, Scope::Subsample(2));
//! if let Some(Ok(features)) = store.features(&key) {
//!     let row = features.row(10);
//! }
//! ```

pub mod features;
pub mod records;
pub mod residue;
pub mod state;
