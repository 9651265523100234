//! Missing-value filtering.
//!
//! A row is kept only when none of its cells is a sentinel under the given
//! [`SentinelPolicy`].

use baac_model::SentinelPolicy;
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;

/// Per-row sentinel flags for one column (`true` = missing).
///
/// Integer, float and text columns are checked through their typed chunked
/// arrays; other dtypes fall back to the generic cell check.
pub fn sentinel_flags(column: &Column, policy: SentinelPolicy) -> Result<Vec<bool>> {
    let dtype = column.dtype();
    let flags = if dtype.is_integer() {
        let values = column.cast(&DataType::Int64)?;
        values
            .i64()?
            .into_iter()
            .map(|value| value.is_none_or(|v| policy.is_sentinel_i64(v)))
            .collect()
    } else if dtype.is_float() {
        let values = column.cast(&DataType::Float64)?;
        values
            .f64()?
            .into_iter()
            .map(|value| value.is_none_or(|v| policy.is_sentinel_f64(v)))
            .collect()
    } else if dtype == &DataType::String {
        column
            .str()?
            .into_iter()
            .map(|value| value.is_none_or(|v| policy.is_sentinel_str(v)))
            .collect()
    } else {
        let mut flags = Vec::with_capacity(column.len());
        for row in 0..column.len() {
            flags.push(policy.is_sentinel(&column.get(row)?));
        }
        flags
    };
    Ok(flags)
}

/// Copy of `df` without rows holding a sentinel in any column.
pub fn remove_missing_values(df: &DataFrame, policy: SentinelPolicy) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];
    for column in df.get_columns() {
        for (slot, missing) in keep.iter_mut().zip(sentinel_flags(column, policy)?) {
            if missing {
                *slot = false;
            }
        }
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let filtered = df.filter(&mask)?;
    debug!(
        policy = policy.label(),
        before = df.height(),
        after = filtered.height(),
        "removed rows with missing values"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "grav" => [Some(1i64), Some(2), Some(3), None, Some(4)],
            "lat" => [48.5f64, f64::NAN, 43.0, 44.0, 45.0],
            "int" => ["1", "2", ".", "4", " 0"],
            "catv" => [7i64, 2, 3, 4, 0],
        }
        .unwrap()
    }

    #[test]
    fn test_sentinel_flags_by_dtype() {
        let df = sample();
        let policy = SentinelPolicy::Lenient;
        assert_eq!(
            sentinel_flags(df.column("grav").unwrap(), policy).unwrap(),
            vec![false, false, false, true, false]
        );
        assert_eq!(
            sentinel_flags(df.column("lat").unwrap(), policy).unwrap(),
            vec![false, true, false, false, false]
        );
        assert_eq!(
            sentinel_flags(df.column("int").unwrap(), policy).unwrap(),
            vec![false, false, true, false, false]
        );
    }

    #[test]
    fn test_remove_missing_values_lenient() {
        let filtered = remove_missing_values(&sample(), SentinelPolicy::Lenient).unwrap();
        assert_eq!(filtered.height(), 2);
        let grav: Vec<Option<i64>> = filtered
            .column("grav")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(grav, vec![Some(1), Some(4)]);
    }

    #[test]
    fn test_remove_missing_values_strict_drops_zero() {
        let filtered = remove_missing_values(&sample(), SentinelPolicy::Strict).unwrap();
        assert_eq!(filtered.height(), 1);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let df = sample();
        let _ = remove_missing_values(&df, SentinelPolicy::Strict).unwrap();
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = remove_missing_values(&sample(), SentinelPolicy::Strict).unwrap();
        let twice = remove_missing_values(&once, SentinelPolicy::Strict).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_empty_frame() {
        let df = df! { "grav" => Vec::<i64>::new() }.unwrap();
        let filtered = remove_missing_values(&df, SentinelPolicy::Strict).unwrap();
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.width(), 1);
    }
}
