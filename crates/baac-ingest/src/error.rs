//! Error types for BAAC data ingestion.

use std::path::PathBuf;

use baac_model::SourceKind;
use thiserror::Error;

/// Errors that can occur while loading source files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file does not exist.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid delimited text.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// File parsed but has no columns.
    #[error("file has no columns: {path}")]
    EmptyCsv { path: PathBuf },

    /// Format parameters that cannot work together.
    #[error("invalid read options: {reason}")]
    InvalidOptions { reason: String },

    /// One of the four source tables failed to load.
    #[error("failed to load {kind} table: {source}")]
    Source {
        kind: SourceKind,
        #[source]
        source: Box<IngestError>,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("data/usagers-2022.csv"),
        };
        assert_eq!(err.to_string(), "source file not found: data/usagers-2022.csv");
    }

    #[test]
    fn test_source_error_names_table() {
        let err = IngestError::Source {
            kind: SourceKind::Vehicles,
            source: Box::new(IngestError::EmptyCsv {
                path: PathBuf::from("vehicules-2022.csv"),
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to load vehicles table: file has no columns: vehicules-2022.csv"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
