//! Cross-cutting defaults.
//!
//! These are configuration defaults, not invariants: override them through
//! [`RankerConfig`](crate::config::RankerConfig).

/// Similarity floor: hits scoring at or below this are discarded.
pub const DEFAULT_RELEVANCE_FLOOR: f32 = 0.05;

/// Default cap on the number of ranked results.
pub const DEFAULT_RESULT_LIMIT: usize = 75;

/// Descriptor texts embedded per pooled model call. Bounds peak compute and
/// memory per call while amortizing invocation overhead across documents.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 12;

/// Max tokens fed to the encoder per text; longer inputs are truncated.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Vector width produced by the deterministic stub backend.
pub const STUB_EMBEDDING_DIM: usize = 384;

/// Delimiter between descriptor text segments. Keeps the segments visually
/// and semantically separable to the encoder.
pub const SEGMENT_DELIMITER: &str = " | ";
