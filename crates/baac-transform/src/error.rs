//! Error types for the transformation pipeline.

use thiserror::Error;

/// Errors raised by pipeline stages.
///
/// `MissingColumn` and `DuplicateColumn` are schema errors; `Conversion` is
/// raised when a recoding rule meets a value it has no rule for.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A join key, derivation input or selected column is absent.
    #[error("column '{column}' not found in {table} table")]
    MissingColumn { table: String, column: String },

    /// A column was requested twice in one selection.
    #[error("column '{column}' requested more than once")]
    DuplicateColumn { column: String },

    /// A value matches no recoding rule and does not parse as the target type.
    #[error("cannot convert value '{value}' in column '{column}' at row {row}")]
    Conversion {
        column: String,
        row: usize,
        value: String,
    },

    /// The external reduction routine failed or returned the wrong shape.
    #[error("dimensionality reduction failed: {message}")]
    Reduction { message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    pub(crate) fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::missing_column("vehicles", "id_vehicule");
        assert_eq!(
            err.to_string(),
            "column 'id_vehicule' not found in vehicles table"
        );

        let err = TransformError::Conversion {
            column: "actp".to_string(),
            row: 12,
            value: "Z".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot convert value 'Z' in column 'actp' at row 12"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("grav".into());
        let err: TransformError = polars_err.into();
        assert!(matches!(err, TransformError::DataFrame { .. }));
    }
}
