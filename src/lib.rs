//! Semantic document ranking engine.
//!
//! Turns a catalog of legal-document descriptors into per-locale vector
//! indexes and ranks the catalog against free-text queries by embedding
//! similarity. The exports are organized by module:
//!
//! ## Catalog Model
//! - [`DocumentDescriptor`], [`TranslationBundle`], [`Locale`] - typed catalog records
//! - [`descriptor_text`] - synthesized embedding input for one document
//!
//! ## Embedding
//! - [`TextEncoder`], [`EncoderConfig`] - candle-backed encoder (with stub mode)
//! - [`Embedder`] - backend trait; [`EmbedderProvider`] - lazy one-shot loading
//!
//! ## Index & Cache
//! - [`SemanticIndex`], [`IndexEntry`] - per-locale vector index
//! - [`IndexCache`] - signature-invalidated, single-flight index builds
//! - [`Signature`] - order-sensitive catalog fingerprint
//!
//! ## Ranking
//! - [`SemanticRanker`] - the public entry point; [`RankedDocument`] - one hit
//!
//! Ranking is an enhancement layer: [`SemanticRanker::rank`] never fails, it
//! degrades to an empty result and logs the cause.
//!
//! ## Test/Mock Support
//! Mock backends are available behind `#[cfg(any(test, feature = "mock"))]`.
//!
//! ```no_run
//! use docrank::{DocumentDescriptor, Locale, RankerConfig, SemanticRanker};
//!
//! # async fn example(documents: Vec<DocumentDescriptor>) -> Vec<docrank::RankedDocument> {
//! let ranker = SemanticRanker::new(RankerConfig::default());
//! ranker.rank("selling my car", Locale::En, &documents).await
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod index;
pub mod ranking;

pub use cache::IndexCache;
pub use catalog::{DocumentDescriptor, Locale, TranslationBundle, UnknownLocale, descriptor_text};
pub use config::{ConfigError, RankerConfig};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    Embedder, EmbedderProvider, EmbeddingBatch, EmbeddingError, EncoderConfig, TextEncoder,
};
pub use hashing::Signature;
pub use index::{IndexEntry, IndexError, SemanticIndex};
pub use ranking::{RankedDocument, SemanticRanker};
