//! Query ranking: the public surface of the engine.
//!
//! Semantic ranking augments a caller's document discovery flow; it must
//! degrade, never break it. Every failure below [`SemanticRanker::rank`]
//! is logged and becomes an empty result — the caller cannot distinguish
//! "no relevant matches" from "semantic search is down" through the return
//! value, only through the logs.

mod error;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::cache::IndexCache;
use crate::catalog::{DocumentDescriptor, Locale};
use crate::config::RankerConfig;
use crate::embedding::{Embedder, EmbedderProvider};
use crate::index::SemanticIndex;

use error::RankError;

/// One ranked hit: a catalog document id and its cosine similarity to the
/// query, clamped into `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub doc_id: String,
    pub score: f32,
}

/// Semantic ranking engine over a document catalog.
///
/// Owns the embedder provider and the per-locale index cache. Construct one
/// per process (or share one via [`SemanticRanker::with_provider`]) instead
/// of reaching for globals; everything the engine mutates lives behind this
/// value.
pub struct SemanticRanker {
    provider: Arc<EmbedderProvider>,
    cache: IndexCache,
    config: RankerConfig,
}

impl std::fmt::Debug for SemanticRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticRanker")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SemanticRanker {
    /// Builds a ranker whose encoder loads lazily from `config.encoder`.
    pub fn new(config: RankerConfig) -> Self {
        let provider = Arc::new(EmbedderProvider::from_config(config.encoder.clone()));
        Self::with_provider(provider, config)
    }

    /// Builds a ranker around an injected embedding backend.
    pub fn with_embedder(embedder: Arc<dyn Embedder>, config: RankerConfig) -> Self {
        Self::with_provider(Arc::new(EmbedderProvider::with_embedder(embedder)), config)
    }

    /// Builds a ranker around an existing provider (shared across engines).
    pub fn with_provider(provider: Arc<EmbedderProvider>, config: RankerConfig) -> Self {
        let cache = IndexCache::new(Arc::clone(&provider), config.batch_size);
        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// The embedder provider (e.g. for an explicit
    /// [`reset`](EmbedderProvider::reset) after a transient load failure).
    pub fn provider(&self) -> &EmbedderProvider {
        &self.provider
    }

    pub fn index_cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Ranks the catalog against `query`, capped at the configured default
    /// result limit.
    pub async fn rank(
        &self,
        query: &str,
        locale: Locale,
        documents: &[DocumentDescriptor],
    ) -> Vec<RankedDocument> {
        self.rank_top(query, locale, documents, self.config.result_limit)
            .await
    }

    /// Ranks the catalog against `query`, returning at most `limit` hits
    /// sorted by descending score.
    ///
    /// Never fails: a blank query, an unavailable backend, or any internal
    /// error yields an empty list, with a log line as the only signal.
    #[instrument(skip_all, fields(%locale, documents = documents.len(), limit = limit))]
    pub async fn rank_top(
        &self,
        query: &str,
        locale: Locale,
        documents: &[DocumentDescriptor],
        limit: usize,
    ) -> Vec<RankedDocument> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.rank_inner(query, locale, documents, limit).await {
            Ok(hits) => hits,
            Err(RankError::BackendUnavailable) => {
                // Already logged once when the load attempt failed.
                debug!("embedding backend unavailable, returning no matches");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "semantic ranking failed, returning no matches");
                Vec::new()
            }
        }
    }

    async fn rank_inner(
        &self,
        query: &str,
        locale: Locale,
        documents: &[DocumentDescriptor],
        limit: usize,
    ) -> Result<Vec<RankedDocument>, RankError> {
        let (embedder, index) = tokio::join!(
            self.provider.get(),
            self.cache.ensure_index(locale, documents)
        );

        let Some(embedder) = embedder else {
            return Err(RankError::BackendUnavailable);
        };
        let index = index?;

        let pooled = embedder.embed_batch(&[query]).await.map_err(|e| {
            RankError::QueryEmbeddingFailed {
                reason: e.to_string(),
            }
        })?;
        let query_vector = pooled
            .vector(0)
            .ok_or_else(|| RankError::QueryEmbeddingFailed {
                reason: "backend returned an empty batch".to_string(),
            })?;

        if !index.is_empty() && query_vector.len() != index.dimension {
            return Err(RankError::DimensionMismatch {
                query: query_vector.len(),
                index: index.dimension,
            });
        }

        Ok(self.score_index(query_vector, &index, limit))
    }

    fn score_index(
        &self,
        query_vector: &[f32],
        index: &SemanticIndex,
        limit: usize,
    ) -> Vec<RankedDocument> {
        let mut hits: Vec<RankedDocument> = index
            .entries
            .iter()
            .map(|entry| RankedDocument {
                doc_id: entry.doc_id.clone(),
                score: similarity(query_vector, &entry.embedding),
            })
            .filter(|hit| hit.score > self.config.relevance_floor)
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(limit);

        debug!(
            hits = hits.len(),
            top_score = hits.first().map(|hit| hit.score),
            "Semantic ranking complete"
        );
        hits
    }
}

/// Dot product of two unit vectors — cosine similarity — clamped into
/// `[-1, 1]`. A non-finite product scores `0`.
fn similarity(query: &[f32], document: &[f32]) -> f32 {
    let dot: f32 = query.iter().zip(document).map(|(q, d)| q * d).sum();
    if dot.is_finite() {
        dot.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
