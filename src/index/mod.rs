//! Semantic index construction.
//!
//! An index pairs every document id with the embedding of its synthesized
//! descriptor text. The pairing is structural ([`IndexEntry`]) so ids and
//! vectors cannot drift apart.

mod error;


pub use error::IndexError;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::catalog::{DocumentDescriptor, Locale, descriptor_text};
use crate::embedding::Embedder;

/// One indexed document: id plus the unit-normalized embedding of its
/// descriptor text.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub doc_id: String,
    pub embedding: Vec<f32>,
}

/// Embeddings for one catalog snapshot in one locale.
///
/// Replaced wholesale whenever the catalog signature changes; never patched
/// in place.
#[derive(Debug, Clone)]
pub struct SemanticIndex {
    pub locale: Locale,
    /// Entries in catalog order.
    pub entries: Vec<IndexEntry>,
    /// Vector width shared by every entry.
    pub dimension: usize,
    /// Construction time. Diagnostic only; no expiry is derived from it.
    pub built_at: DateTime<Utc>,
}

impl SemanticIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Synthesized embedding input for one document.
#[derive(Debug, Clone)]
pub(crate) struct DescriptorInput {
    pub doc_id: String,
    pub text: String,
}

impl DescriptorInput {
    /// Synthesizes inputs for a catalog snapshot, in catalog order.
    pub fn from_documents(documents: &[DocumentDescriptor], locale: Locale) -> Vec<Self> {
        documents
            .iter()
            .map(|doc| Self {
                doc_id: doc.id.clone(),
                text: descriptor_text(doc, locale),
            })
            .collect()
    }
}

/// Embeds descriptor inputs into a [`SemanticIndex`].
///
/// Inputs are processed in fixed-size batches, sequentially, one pooled
/// model call per batch. Any embedding failure aborts the whole build —
/// callers must treat an unavailable index as exceptional, not as an empty
/// catalog.
pub(crate) async fn build_index(
    embedder: Arc<dyn Embedder>,
    locale: Locale,
    inputs: Vec<DescriptorInput>,
    batch_size: usize,
) -> Result<SemanticIndex, IndexError> {
    let mut entries: Vec<IndexEntry> = Vec::with_capacity(inputs.len());
    let mut dimension = 0usize;

    for batch in inputs.chunks(batch_size.max(1)) {
        let texts: Vec<&str> = batch.iter().map(|input| input.text.as_str()).collect();
        let pooled = embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| IndexError::EmbeddingFailed {
                reason: e.to_string(),
            })?;

        if pooled.len() != batch.len() {
            return Err(IndexError::BatchMismatch {
                expected: batch.len(),
                actual: pooled.len(),
            });
        }
        if dimension == 0 {
            dimension = pooled.dimension();
        } else if pooled.dimension() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: pooled.dimension(),
            });
        }

        for (input, vector) in batch.iter().zip(pooled.iter()) {
            entries.push(IndexEntry {
                doc_id: input.doc_id.clone(),
                embedding: vector.to_vec(),
            });
        }
    }

    if dimension == 0 {
        dimension = embedder.dimension();
    }

    info!(
        %locale,
        documents = entries.len(),
        dimension,
        "Semantic index built"
    );

    Ok(SemanticIndex {
        locale,
        entries,
        dimension,
        built_at: Utc::now(),
    })
}
