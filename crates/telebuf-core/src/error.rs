//! Shared error type across telebuf crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, TelebufError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum TelebufError {
    /// Write or lookup referencing a name never defined.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    /// Gauge write on a rate metric, rate delta on a gauge metric, or a
    /// gauge value whose type does not match the metric's declared kind.
    #[error("kind mismatch on {name}: {detail}")]
    KindMismatch { name: String, detail: String },
    /// A metric with this name already exists in the registry.
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    /// Backend rejected or failed to process descriptor creation; the cycle
    /// aborts before submission and retries next tick.
    #[error("descriptor registration failed: {0}")]
    Registration(String),
    /// Backend rejected or failed to process a time-series batch;
    /// accumulators are preserved for retry.
    #[error("time-series submission failed: {0}")]
    Submission(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("io: {0}")]
    Io(String),
}

impl TelebufError {
    /// Stable short code, used as a log label.
    pub fn code(&self) -> &'static str {
        match self {
            TelebufError::UnknownMetric(_) => "UNKNOWN_METRIC",
            TelebufError::KindMismatch { .. } => "KIND_MISMATCH",
            TelebufError::DuplicateMetric(_) => "DUPLICATE_METRIC",
            TelebufError::Registration(_) => "REGISTRATION",
            TelebufError::Submission(_) => "SUBMISSION",
            TelebufError::Config(_) => "CONFIG",
            TelebufError::Io(_) => "IO",
        }
    }
}
