//! Storage layer: JSON corpus loading and snapshot export (JSON, Arrow IPC, Parquet).

mod corpus;
mod error;
mod snapshot;

pub use corpus::{DocumentStore, Envelope, LoadReport};
pub use error::StoreError;
#[cfg(feature = "parquet")]
pub use snapshot::write_parquet;
pub use snapshot::{ExportFormat, write_ipc, write_json};
