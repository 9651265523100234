//! Column selection.

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::error::{Result, TransformError};

/// Copy of `df` holding exactly `features`, in the requested order.
pub fn select_features<S: AsRef<str>>(df: &DataFrame, features: &[S]) -> Result<DataFrame> {
    let mut seen = BTreeSet::new();
    for name in features {
        let name = name.as_ref();
        if !seen.insert(name) {
            return Err(TransformError::DuplicateColumn {
                column: name.to_string(),
            });
        }
        if df.column(name).is_err() {
            return Err(TransformError::missing_column("transformed", name));
        }
    }

    Ok(df.select(features.iter().map(|name| name.as_ref()))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "grav" => [1i64, 4],
            "age" => [32i64, -1],
            "secu" => [2i64, 1],
        }
        .unwrap()
    }

    #[test]
    fn test_select_in_requested_order() {
        let selected = select_features(&sample(), &["secu", "grav"]).unwrap();
        let names: Vec<&str> = selected
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["secu", "grav"]);
        assert_eq!(selected.height(), 2);
    }

    #[test]
    fn test_select_missing_column() {
        let err = select_features(&sample(), &["grav", "vma"]).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { column, .. } if column == "vma"));
    }

    #[test]
    fn test_select_duplicate_column() {
        let err = select_features(&sample(), &["grav", "age", "grav"]).unwrap_err();
        assert!(matches!(err, TransformError::DuplicateColumn { column } if column == "grav"));
    }

    #[test]
    fn test_select_accepts_owned_names() {
        let features = vec!["age".to_string()];
        let selected = select_features(&sample(), &features).unwrap();
        assert_eq!(selected.width(), 1);
    }
}
