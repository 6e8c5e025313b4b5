use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be at least 1")]
    ZeroValue { field: &'static str },

    #[error("relevance floor must be finite, got {value}")]
    NonFiniteFloor { value: f32 },
}
