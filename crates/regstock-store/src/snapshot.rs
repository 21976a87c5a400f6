//! Writers for analysis output: pretty JSON, Arrow IPC files and, with the
//! `parquet` feature, Parquet files.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use tracing::info;

use crate::StoreError;

/// Output format for snapshot exports, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    ArrowIpc,
    #[cfg(feature = "parquet")]
    Parquet,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "arrow" | "ipc" => Some(Self::ArrowIpc),
            #[cfg(feature = "parquet")]
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Serialise any value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    info!(path = %path.display(), "wrote json snapshot");
    Ok(())
}

/// Write batches sharing one schema to an Arrow IPC file.
pub fn write_ipc(path: &Path, batches: &[RecordBatch]) -> Result<(), StoreError> {
    let Some(first) = batches.first() else {
        return Err(StoreError::Arrow(arrow::error::ArrowError::InvalidArgumentError(
            "no batches to write".into(),
        )));
    };
    let file = File::create(path)?;
    let mut writer = FileWriter::try_new(file, first.schema().as_ref())?;
    let mut rows = 0;
    for batch in batches {
        writer.write(batch)?;
        rows += batch.num_rows();
    }
    writer.finish()?;
    info!(path = %path.display(), rows, "wrote arrow ipc snapshot");
    Ok(())
}

/// Write batches sharing one schema to a Parquet file.
#[cfg(feature = "parquet")]
pub fn write_parquet(path: &Path, batches: &[RecordBatch]) -> Result<(), StoreError> {
    use parquet::arrow::ArrowWriter;

    let Some(first) = batches.first() else {
        return Err(StoreError::Arrow(arrow::error::ArrowError::InvalidArgumentError(
            "no batches to write".into(),
        )));
    };
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, first.schema(), None)?;
    let mut rows = 0;
    for batch in batches {
        writer.write(batch)?;
        rows += batch.num_rows();
    }
    writer.close()?;
    info!(path = %path.display(), rows, "wrote parquet snapshot");
    Ok(())
}
