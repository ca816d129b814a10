//! Company profile matching service
//!
//! Resolves partial, noisy company descriptions (name, website, phone,
//! Facebook profile) to canonical records from a profile catalog, with
//! a confidence score. The engine normalizes attributes, retrieves
//! candidates through tiered index queries, scores each candidate per
//! field, and deterministically selects the best one.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{BatchCoordinator, MatchError, Matcher, MatcherConfig, SearchIndex};
pub use crate::models::{
    CompanyRecord, FieldKind, MatchRequest, MatchResult, NormalizedAttributes, ScoringWeights,
};
