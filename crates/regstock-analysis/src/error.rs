use regstock_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    #[error("unknown exclusion category: {0}")]
    UnknownCategory(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
