use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corpus file not found: {0}")]
    CorpusNotFound(std::path::PathBuf),

    #[error("unrecognised corpus layout: {0}")]
    Envelope(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("parquet error: {0}")]
    Parquet(#[from] ::parquet::errors::ParquetError),
}
