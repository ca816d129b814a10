use crate::core::retrieval::{CandidateRetriever, IndexError, RetryPolicy, SearchIndex};
use crate::core::{normalize, scoring, selector};
use crate::models::{MatchRequest, MatchResult, ScoringWeights};
use std::sync::Arc;
use thiserror::Error;

/// Errors a single resolution can surface to the caller.
///
/// A no-match outcome is not an error; it is a MatchResult with no
/// candidate.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("request has no usable attributes after normalization")]
    InvalidInput,

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("item aborted by batch timeout")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl MatchError {
    /// Stable machine-readable kind for per-item error markers.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::InvalidInput => "invalid_input",
            MatchError::Index(_) => "index_unavailable",
            MatchError::Timeout => "timeout",
            MatchError::Internal(_) => "internal",
        }
    }
}

/// Tunables for one matcher instance. Explicit value, never ambient
/// state, so tests can run alternate weight tables.
#[derive(Debug, Clone, Copy)]
pub struct MatcherConfig {
    pub weights: ScoringWeights,
    pub name_distance_threshold: f64,
    pub candidate_limit: usize,
    pub name_fuzzy_max_edits: u8,
    pub retry: RetryPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            name_distance_threshold: 1.0,
            candidate_limit: 10,
            name_fuzzy_max_edits: 2,
            retry: RetryPolicy::default(),
        }
    }
}

/// Main resolution orchestrator.
///
/// # Pipeline stages
/// 1. Normalize the raw attribute bundle
/// 2. Reject requests with no usable attributes
/// 3. Retrieve candidates through the tiered query strategy
/// 4. Score each candidate per field
/// 5. Select the best candidate with a confidence value
pub struct Matcher {
    retriever: CandidateRetriever,
    weights: ScoringWeights,
    name_distance_threshold: f64,
}

impl Matcher {
    pub fn new(index: Arc<dyn SearchIndex>, config: MatcherConfig) -> Self {
        let retriever = CandidateRetriever::new(
            index,
            config.candidate_limit,
            config.name_fuzzy_max_edits,
            config.retry,
        );
        Self {
            retriever,
            weights: config.weights,
            name_distance_threshold: config.name_distance_threshold,
        }
    }

    /// Resolve one request to the best-matching canonical record.
    pub async fn resolve(&self, request: &MatchRequest) -> Result<MatchResult, MatchError> {
        let normalized = normalize::normalize(request);

        if normalized.is_empty() {
            return Err(MatchError::InvalidInput);
        }

        let candidates = self.retriever.retrieve(&normalized).await?;
        tracing::debug!("Retrieved {} candidates", candidates.len());

        let scored = candidates
            .into_iter()
            .map(|candidate| {
                let scores = scoring::score_candidate(
                    &normalized,
                    &candidate.record,
                    &self.weights,
                    self.name_distance_threshold,
                );
                (candidate, scores)
            })
            .collect();

        Ok(selector::select(&normalized, scored, &self.weights))
    }
}
