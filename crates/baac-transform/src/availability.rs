//! Per-column data availability.

use baac_model::SentinelPolicy;
use polars::prelude::*;
use serde::Serialize;

use crate::error::{Result, TransformError};
use crate::filter::sentinel_flags;

/// Availability of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAvailability {
    pub column: String,
    /// Rows holding a real value.
    pub available: usize,
    pub total: usize,
    /// `available / total` as a percentage; 0 for an empty table.
    pub percent: f64,
}

impl ColumnAvailability {
    fn from_flags(column: &str, flags: &[bool]) -> Self {
        let total = flags.len();
        let available = flags.iter().filter(|missing| !**missing).count();
        let percent = if total == 0 {
            0.0
        } else {
            available as f64 * 100.0 / total as f64
        };
        Self {
            column: column.to_string(),
            available,
            total,
            percent,
        }
    }

    pub fn missing(&self) -> usize {
        self.total - self.available
    }
}

/// Percentage (0 to 100) of rows of `column` that are not sentinels.
pub fn availability(df: &DataFrame, column: &str, policy: SentinelPolicy) -> Result<f64> {
    Ok(column_availability(df, column, policy)?.percent)
}

/// Full counts for one column.
pub fn column_availability(
    df: &DataFrame,
    column: &str,
    policy: SentinelPolicy,
) -> Result<ColumnAvailability> {
    let values = df
        .column(column)
        .map_err(|_| TransformError::missing_column("input", column))?;
    let flags = sentinel_flags(values, policy)?;
    Ok(ColumnAvailability::from_flags(column, &flags))
}

/// Availability of every column, in table order.
pub fn availability_report(
    df: &DataFrame,
    policy: SentinelPolicy,
) -> Result<Vec<ColumnAvailability>> {
    df.get_columns()
        .iter()
        .map(|column| {
            let flags = sentinel_flags(column, policy)?;
            Ok(ColumnAvailability::from_flags(column.name(), &flags))
        })
        .collect()
}
