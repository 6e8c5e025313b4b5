//! Candle-backed text encoder (BERT family, mean pooling).
//!
//! Use [`EncoderConfig::stub`] for tests/examples without model files.

pub mod config;


pub use config::EncoderConfig;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_tokenizer;
use crate::embedding::{Embedder, EmbeddingBatch, l2_normalize};

enum EncoderBackend {
    Model {
        model: BertModel,
        tokenizer: tokenizers::Tokenizer,
        device: Device,
        hidden_size: usize,
    },
    Stub,
}

/// Text encoder producing mean-pooled, L2-normalized embeddings.
///
/// The output width is whatever the loaded model reports (`hidden_size`),
/// not a compile-time constant: one process may serve models of different
/// widths across restarts, and the index carries the width with it.
pub struct TextEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for TextEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({device:?})"),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("dimension", &self.dimension())
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl TextEncoder {
    /// Loads the encoder from a config (stub mode requires no files).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("text encoder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for text encoder");

        if !config.model_available() || !config.tokenizer_available() {
            return Err(EmbeddingError::ModelNotFound {
                path: config.model_dir.clone(),
            });
        }

        let (model, tokenizer, hidden_size) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            hidden_size,
            max_seq_len = config.max_seq_len,
            "Text encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
                hidden_size,
            },
            config,
        })
    }

    fn load_model(
        config: &EncoderConfig,
        device: &Device,
    ) -> Result<(BertModel, tokenizers::Tokenizer, usize), EmbeddingError> {
        let tokenizer = load_tokenizer(&config.model_dir, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("failed to load tokenizer: {e}"),
            }
        })?;

        let config_content = std::fs::read_to_string(config.model_dir.join("config.json"))?;
        let bert_config: BertConfig =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to parse config.json: {e}"),
            })?;

        let weights_path = config.model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device).map_err(
                |e| EmbeddingError::ModelLoadFailed {
                    reason: format!("failed to map model weights: {e}"),
                },
            )?
        };

        let hidden_size = bert_config.hidden_size;
        let model =
            BertModel::load(vb, &bert_config).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load BERT model: {e}"),
            })?;

        Ok((model, tokenizer, hidden_size))
    }

    /// Embeds a single text.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
                hidden_size,
            } => self.encode_with_model(text, model, tokenizer, device, *hidden_size),
            EncoderBackend::Stub => Ok(self.encode_stub(text)),
        }
    }

    fn encode_with_model(
        &self,
        text: &str,
        model: &BertModel,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
        hidden_size: usize,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let tokens = encoding.get_ids();
        if tokens.is_empty() {
            // Zero vector: scores 0 against everything and falls below the
            // relevance floor downstream.
            return Ok(vec![0.0; hidden_size]);
        }

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "Generating embedding (encoder forward pass)"
        );

        let input_ids = Tensor::new(tokens, device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        // [1, seq_len, hidden] -> mean over the token axis -> [hidden]
        let hidden_states = model.forward(&input_ids, &token_type_ids, None)?;
        let pooled = (hidden_states.sum(1)? / tokens.len() as f64)?.squeeze(0)?;

        let mut vector = pooled.to_vec1::<f32>()?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn encode_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut vector = Vec::with_capacity(self.config.stub_dim);
        for _ in 0..self.config.stub_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            vector.push(value);
        }

        l2_normalize(&mut vector);
        vector
    }

    /// Output vector width (model `hidden_size`, or `stub_dim` in stub mode).
    pub fn dimension(&self) -> usize {
        match &self.backend {
            EncoderBackend::Model { hidden_size, .. } => *hidden_size,
            EncoderBackend::Stub => self.config.stub_dim,
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EncoderBackend::Model { .. })
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

#[async_trait]
impl Embedder for TextEncoder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<EmbeddingBatch, EmbeddingError> {
        let dimension = self.dimension();
        let mut data = Vec::with_capacity(texts.len() * dimension);
        for text in texts {
            data.extend_from_slice(&self.encode(text)?);
        }
        EmbeddingBatch::new(data, dimension)
    }

    fn dimension(&self) -> usize {
        TextEncoder::dimension(self)
    }
}
