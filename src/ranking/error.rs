use thiserror::Error;

use crate::index::IndexError;

/// Internal failure taxonomy for one ranking call. Absorbed at the
/// [`SemanticRanker`](super::SemanticRanker) boundary; never visible to
/// callers.
#[derive(Debug, Error)]
pub(crate) enum RankError {
    #[error("embedding backend unavailable")]
    BackendUnavailable,

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("query embedding failed: {reason}")]
    QueryEmbeddingFailed { reason: String },

    #[error("query/index dimension mismatch: query {query}, index {index}")]
    DimensionMismatch { query: usize, index: usize },
}
