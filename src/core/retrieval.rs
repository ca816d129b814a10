use crate::models::{NormalizedAttributes, ScoredCandidate};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from the external profile index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),

    #[error("invalid index response: {0}")]
    InvalidResponse(String),
}

/// Keyword fields the index supports exact-term queries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexField {
    Domain,
    PhoneNormalized,
    FacebookNormalized,
}

/// A structured query against the profile index.
///
/// The engine only ever issues these three shapes; how they translate
/// to a concrete index DSL is the implementation's business.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateQuery {
    /// Exact match on a keyword field.
    Term { field: IndexField, value: String },
    /// Edit-distance-bounded text match across the name fields.
    FuzzyName { value: String, max_edits: u8 },
    /// Broad multi-field query over whatever attributes are present.
    /// Used only when every specific tier came back empty.
    Fallback {
        name: Option<String>,
        domain: Option<String>,
        phone: Option<String>,
        facebook: Option<String>,
    },
}

/// Read-only query capability the engine requires from the index.
///
/// Queries are pure reads, so retrying them is always safe.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(
        &self,
        query: &CandidateQuery,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>, IndexError>;
}

/// Retry policy for index queries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// Retrieves a bounded candidate set using tiered query strategies.
///
/// Tiers are evaluated in order with early exit: the first tier that
/// yields at least one candidate wins. An empty result from every tier
/// including the fallback is a normal outcome, not an error.
pub struct CandidateRetriever {
    index: Arc<dyn SearchIndex>,
    limit: usize,
    name_fuzzy_max_edits: u8,
    retry: RetryPolicy,
}

impl CandidateRetriever {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        limit: usize,
        name_fuzzy_max_edits: u8,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            index,
            limit,
            name_fuzzy_max_edits,
            retry,
        }
    }

    /// Ordered query tiers for the given normalized attributes.
    /// Deterministic identifier tiers first, then fuzzy name, then the
    /// broad fallback.
    pub fn build_tiers(&self, normalized: &NormalizedAttributes) -> Vec<CandidateQuery> {
        let mut tiers = Vec::new();

        if !normalized.domain.is_empty() {
            tiers.push(CandidateQuery::Term {
                field: IndexField::Domain,
                value: normalized.domain.clone(),
            });
        }
        if !normalized.phone_digits.is_empty() {
            tiers.push(CandidateQuery::Term {
                field: IndexField::PhoneNormalized,
                value: normalized.phone_digits.clone(),
            });
        }
        if !normalized.facebook_id.is_empty() {
            tiers.push(CandidateQuery::Term {
                field: IndexField::FacebookNormalized,
                value: normalized.facebook_id.clone(),
            });
        }
        if !normalized.name_key.is_empty() {
            tiers.push(CandidateQuery::FuzzyName {
                value: normalized.name_key.clone(),
                max_edits: self.name_fuzzy_max_edits,
            });
        }

        if !normalized.is_empty() {
            tiers.push(CandidateQuery::Fallback {
                name: non_empty(&normalized.name_key),
                domain: non_empty(&normalized.domain),
                phone: non_empty(&normalized.phone_digits),
                facebook: non_empty(&normalized.facebook_id),
            });
        }

        tiers
    }

    /// Run the tiers in order, returning the first non-empty candidate
    /// set, bounded by the configured limit.
    pub async fn retrieve(
        &self,
        normalized: &NormalizedAttributes,
    ) -> Result<Vec<ScoredCandidate>, IndexError> {
        for query in self.build_tiers(normalized) {
            let candidates = self.search_with_retry(&query).await?;
            if !candidates.is_empty() {
                tracing::debug!("Tier {:?} yielded {} candidates", query, candidates.len());
                return Ok(candidates);
            }
        }

        Ok(vec![])
    }

    /// Bounded retries with exponential backoff; queries are pure
    /// reads so repeating them is idempotent.
    async fn search_with_retry(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<ScoredCandidate>, IndexError> {
        let mut last_err = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let backoff = self.retry.backoff * 2u32.saturating_pow(attempt - 1);
                tokio::time::sleep(backoff).await;
            }

            match self.index.search(query, self.limit).await {
                Ok(candidates) => return Ok(candidates),
                Err(e) => {
                    tracing::warn!(
                        "Index query failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.retry.max_attempts,
                        e
                    );
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| IndexError::Unavailable("no attempts made".into())))
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
