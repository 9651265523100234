//! Hand-off to an external dimensionality-reduction routine.
//!
//! The pipeline does not fit projections itself. Callers implement
//! [`Reducer`] over whatever numeric library they use, and
//! [`reduce_features`] takes care of matrix extraction, shape checks and
//! naming the output columns `PC0`, `PC1`, ...

use baac_common::{any_to_f64, any_to_string, column_names};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, TransformError};

/// Prefix of reduced component columns.
pub const COMPONENT_PREFIX: &str = "PC";

/// Failure reported by a [`Reducer`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ReductionError {
    message: String,
}

impl ReductionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Split the label column off a table.
///
/// Returns the features without the label, and the label column.
pub fn split_label(df: &DataFrame, label: &str) -> Result<(DataFrame, Column)> {
    let target = df
        .column(label)
        .map_err(|_| TransformError::missing_column("selected", label))?
        .clone();
    let features = df.drop(label)?;
    Ok((features, target))
}

/// Dense row-major matrix of a numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Every cell must be numeric and present; NaN counts as absent.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let columns = column_names(df);
        let mut rows = vec![Vec::with_capacity(df.width()); df.height()];

        for column in df.get_columns() {
            for (row, values) in rows.iter_mut().enumerate() {
                let cell = column.get(row)?;
                let number = match &cell {
                    AnyValue::String(_) | AnyValue::StringOwned(_) => None,
                    other => any_to_f64(other.clone()).filter(|value| !value.is_nan()),
                };
                let Some(number) = number else {
                    return Err(TransformError::Conversion {
                        column: column.name().to_string(),
                        row,
                        value: any_to_string(cell),
                    });
                };
                values.push(number);
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}

/// An external projection routine, e.g. PCA.
pub trait Reducer {
    /// Project `matrix` onto `components` dimensions, one output row per input row.
    fn reduce(
        &self,
        matrix: &FeatureMatrix,
        components: usize,
    ) -> std::result::Result<Vec<Vec<f64>>, ReductionError>;
}

/// Reduce a feature table to `components` columns named `PC0..`.
pub fn reduce_features<R: Reducer + ?Sized>(
    df: &DataFrame,
    reducer: &R,
    components: usize,
) -> Result<DataFrame> {
    if components == 0 || components > df.width() {
        return Err(TransformError::Reduction {
            message: format!(
                "cannot reduce {} columns to {components} components",
                df.width()
            ),
        });
    }

    let matrix = FeatureMatrix::from_frame(df)?;
    let projected = reducer
        .reduce(&matrix, components)
        .map_err(|err| TransformError::Reduction {
            message: err.to_string(),
        })?;

    if projected.len() != matrix.n_rows() {
        return Err(TransformError::Reduction {
            message: format!(
                "reducer returned {} rows for {} input rows",
                projected.len(),
                matrix.n_rows()
            ),
        });
    }
    if let Some((row, values)) = projected
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != components)
    {
        return Err(TransformError::Reduction {
            message: format!(
                "reducer returned {} values at row {row}, expected {components}",
                values.len()
            ),
        });
    }

    let columns: Vec<Column> = (0..components)
        .map(|index| {
            let values: Vec<f64> = projected.iter().map(|row| row[index]).collect();
            Column::new(format!("{COMPONENT_PREFIX}{index}").into(), values)
        })
        .collect();
    let reduced = DataFrame::new(columns)?;
    debug!(
        rows = reduced.height(),
        from = matrix.n_cols(),
        to = components,
        "reduced features"
    );
    Ok(reduced)
}
