//! Test doubles for the embedding backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{Embedder, EmbeddingBatch, EmbeddingError, l2_normalize};

type EmbedFn = dyn Fn(&str) -> Vec<f32> + Send + Sync;

/// Programmable embedder: maps each text through a caller-supplied function
/// and counts pooled calls.
pub struct MockEmbedder {
    dimension: usize,
    embed: Box<EmbedFn>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
}

impl std::fmt::Debug for MockEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEmbedder")
            .field("dimension", &self.dimension)
            .field("calls", &self.batch_calls())
            .field("fail", &self.fail)
            .finish_non_exhaustive()
    }
}

impl MockEmbedder {
    /// Embeds via `embed`, which must return `dimension`-wide vectors.
    pub fn new(dimension: usize, embed: impl Fn(&str) -> Vec<f32> + Send + Sync + 'static) -> Self {
        Self {
            dimension,
            embed: Box::new(embed),
            calls: AtomicUsize::new(0),
            delay: None,
            fail: false,
        }
    }

    /// Keyword-keyed embedder: a text containing the keyword of rule
    /// `(keyword, axis)` gets weight on that axis; the result is
    /// L2-normalized. Texts matching no rule embed to the zero vector.
    pub fn keyed(dimension: usize, rules: Vec<(&str, usize)>) -> Self {
        let rules: Vec<(String, usize)> = rules
            .into_iter()
            .map(|(keyword, axis)| (keyword.to_lowercase(), axis))
            .collect();

        Self::new(dimension, move |text| {
            let lowered = text.to_lowercase();
            let mut vector = vec![0.0f32; dimension];
            for (keyword, axis) in &rules {
                if lowered.contains(keyword) {
                    vector[*axis] += 1.0;
                }
            }
            l2_normalize(&mut vector);
            vector
        })
    }

    /// An embedder whose every pooled call fails.
    pub fn failing(dimension: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dimension, move |_| vec![0.0; dimension])
        }
    }

    /// Sleeps this long inside every pooled call (for in-flight tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of pooled `embed_batch` calls made so far.
    pub fn batch_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<EmbeddingBatch, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock backend forced failure".to_string(),
            });
        }

        let mut data = Vec::with_capacity(texts.len() * self.dimension);
        for text in texts {
            let vector = (self.embed)(text);
            debug_assert_eq!(vector.len(), self.dimension);
            data.extend_from_slice(&vector);
        }
        EmbeddingBatch::new(data, self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
