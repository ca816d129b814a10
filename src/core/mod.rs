// Core algorithm exports
pub mod batch;
pub mod matcher;
pub mod normalize;
pub mod retrieval;
pub mod scoring;
pub mod selector;
pub mod similarity;

pub use batch::BatchCoordinator;
pub use matcher::{MatchError, Matcher, MatcherConfig};
pub use retrieval::{
    CandidateQuery, CandidateRetriever, IndexError, IndexField, RetryPolicy, SearchIndex,
};
pub use scoring::{score_candidate, total_score};
pub use selector::select;
pub use similarity::{name_score, normalized_edit_distance};
