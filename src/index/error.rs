use thiserror::Error;

/// Errors from building a semantic index.
///
/// `Clone` so a single in-flight build can fan its outcome out to every
/// caller awaiting the same shared task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// The embedding backend never became available; there is no degraded
    /// empty-index fallback.
    #[error("embedding backend unavailable")]
    EmbedderUnavailable,

    #[error("embedding documents failed: {reason}")]
    EmbeddingFailed { reason: String },

    /// A pooled call returned a different number of vectors than it was
    /// given texts.
    #[error("embedding batch mismatch: expected {expected} vectors, got {actual}")]
    BatchMismatch { expected: usize, actual: usize },

    /// A later batch reported a different vector width than the first.
    #[error("inconsistent embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index build task failed: {reason}")]
    BuildTaskFailed { reason: String },
}
