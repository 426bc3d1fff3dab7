use thiserror::Error;

/// Validation and contract errors exposed by `bullion-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown metal '{value}', expected one of gold, silver, platinum, palladium")]
    UnknownMetal { value: String },

    #[error("spread {value} must be finite and within [0, 1)")]
    InvalidSpread { value: f64 },

    #[error("latency range {min_ms}..={max_ms} ms is inverted")]
    InvalidLatencyRange { min_ms: u64, max_ms: u64 },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("catalog lists metal '{kind}' more than once")]
    DuplicateProfile { kind: &'static str },
    #[error("catalog has no profile for metal '{kind}'")]
    MissingProfile { kind: &'static str },

    #[error("invalid value '{value}' for {key}")]
    InvalidSetting { key: &'static str, value: String },
}

/// Top-level error type for core operations that touch I/O.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
}
