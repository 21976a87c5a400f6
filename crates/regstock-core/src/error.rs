use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config file not found: {0}")]
    ConfigNotFound(std::path::PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid classifier tables: {0}")]
    InvalidTables(String),

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
