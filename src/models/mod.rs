// Model exports
pub mod domain;
pub mod responses;

pub use domain::{
    CompanyRecord, FieldKind, FieldScore, MatchRequest, MatchResult, NormalizedAttributes,
    ScoredCandidate, ScoringWeights,
};
pub use responses::{
    BulkMatchItem, BulkMatchResponse, ErrorResponse, HealthResponse, ItemError, MatchResponse,
};
