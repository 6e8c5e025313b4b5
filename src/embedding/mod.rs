//! Embedding backends.
//!
//! - [`encoder`] provides the candle-backed text encoder (with a
//!   deterministic stub mode for tests).
//! - [`provider`] owns the lazy, process-lifetime load of the backend.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod provider;
mod utils;

pub use encoder::{EncoderConfig, TextEncoder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use provider::EmbedderProvider;

use async_trait::async_trait;

/// Pooled output of one batch embedding call: a flat buffer of vector
/// values plus the backend-reported vector width.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingBatch {
    data: Vec<f32>,
    dimension: usize,
}

impl EmbeddingBatch {
    /// Wraps a flat buffer. `data.len()` must be a whole multiple of
    /// `dimension`.
    pub fn new(data: Vec<f32>, dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 || !data.len().is_multiple_of(dimension) {
            return Err(EmbeddingError::MalformedBatch {
                len: data.len(),
                dimension,
            });
        }
        Ok(Self { data, dimension })
    }

    /// Vector width shared by every slice in this batch.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of vectors in the batch.
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the `i`-th vector, if present.
    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Iterates the vectors in input order.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension)
    }
}

/// Batch text-to-vector backend: strings in, pooled unit-normalized
/// fixed-width vectors out.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds `texts`, returning one unit-normalized vector per input.
    async fn embed_batch(&self, texts: &[&str]) -> Result<EmbeddingBatch, EmbeddingError>;

    /// Output vector width.
    fn dimension(&self) -> usize;
}

/// Scales `vector` to unit length in place. A zero vector is left as-is.
pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
