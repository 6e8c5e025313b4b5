//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `DOCRANK_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::str::FromStr;

use crate::constants::{DEFAULT_EMBED_BATCH_SIZE, DEFAULT_RELEVANCE_FLOOR, DEFAULT_RESULT_LIMIT};
use crate::embedding::EncoderConfig;

/// Engine configuration.
///
/// The similarity floor, result cap and batch size were fixed literals in
/// earlier revisions of this engine; they are deliberate defaults here, not
/// requirements — tune per deployment.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Encoder settings (model directory, sequence length, stub mode).
    pub encoder: EncoderConfig,

    /// Hits scoring at or below this are discarded. Default: `0.05`.
    pub relevance_floor: f32,

    /// Default cap on returned results. Default: `75`.
    pub result_limit: usize,

    /// Descriptor texts per pooled embedding call. Default: `12`.
    pub batch_size: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig::default(),
            relevance_floor: DEFAULT_RELEVANCE_FLOOR,
            result_limit: DEFAULT_RESULT_LIMIT,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl RankerConfig {
    const ENV_RELEVANCE_FLOOR: &'static str = "DOCRANK_RELEVANCE_FLOOR";
    const ENV_RESULT_LIMIT: &'static str = "DOCRANK_RESULT_LIMIT";
    const ENV_BATCH_SIZE: &'static str = "DOCRANK_BATCH_SIZE";

    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            encoder: EncoderConfig::from_env(),
            relevance_floor: parse_env(Self::ENV_RELEVANCE_FLOOR, defaults.relevance_floor)?,
            result_limit: parse_env(Self::ENV_RESULT_LIMIT, defaults.result_limit)?,
            batch_size: parse_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates basic invariants (does not touch the filesystem).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.relevance_floor.is_finite() {
            return Err(ConfigError::NonFiniteFloor {
                value: self.relevance_floor,
            });
        }
        if self.result_limit == 0 {
            return Err(ConfigError::ZeroValue {
                field: "result_limit",
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroValue {
                field: "batch_size",
            });
        }
        Ok(())
    }
}

fn parse_env<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                var,
                value,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}
