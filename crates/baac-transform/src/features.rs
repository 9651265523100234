//! Derived and recoded features.
//!
//! Each rule exists twice: a value-level function that states the recoding,
//! and a frame-level step that applies it to one column of an owned copy.

use baac_common::{any_to_i64, any_to_string};
use baac_model::schema::{
    ACTP, AGE, AN_NAIS, CHOC, INFRA, NBV, NBV_ERROR_MARKER, OBS, OBSCAR, OBSM, REBASED_COLUMNS,
    SECU, SECU1, SECU2, SECU3, VOSP,
};
use baac_model::{DEFAULT_REFERENCE_YEAR, UNKNOWN};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TransformError};

/// `actp` code for a pedestrian moving in the direction of the vehicle.
pub const ACTP_DIRECTION_CODE: i64 = 10;

/// Offset applied to fixed-obstacle codes in `obscar`.
pub const FIXED_OBSTACLE_OFFSET: i64 = 10;

/// Configuration of the feature rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOptions {
    /// Year a birth year is subtracted from.
    pub reference_year: i64,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

/// Age at the reference year, or [`UNKNOWN`] without a birth year.
pub fn age(reference_year: i64, birth_year: Option<i64>) -> i64 {
    birth_year.map_or(UNKNOWN, |year| reference_year - year)
}

/// Recode a textual `actp` value.
///
/// `"A"` becomes 10, `"B"` and `-1` become -1, other integers pass through.
/// Returns `None` for anything else.
pub fn recode_actp(raw: &str) -> Option<i64> {
    match raw.trim() {
        "A" => Some(ACTP_DIRECTION_CODE),
        "B" => Some(UNKNOWN),
        other => other.parse().ok(),
    }
}

/// Recode a textual `nbv` value before re-basing.
pub fn recode_nbv(raw: &str) -> Option<i64> {
    match raw.trim() {
        NBV_ERROR_MARKER => Some(UNKNOWN),
        other => other.parse().ok(),
    }
}

/// Shift a code by one so `0` is no longer read as missing; `-1` is kept.
pub fn rebase(value: i64) -> i64 {
    if value == UNKNOWN { value } else { value + 1 }
}

/// Number of safety equipment slots filled, offset by one.
///
/// A slot counts when it is present and neither 0 ("no equipment") nor -1.
/// When all three slots are missing the result is [`UNKNOWN`].
pub fn secu_count(slots: [Option<i64>; 3]) -> i64 {
    let answered = slots
        .iter()
        .any(|slot| slot.is_some_and(|value| value != UNKNOWN));
    if !answered {
        return UNKNOWN;
    }
    let filled = slots
        .iter()
        .filter(|slot| slot.is_some_and(|value| value != 0 && value != UNKNOWN))
        .count() as i64;
    filled + 1
}

/// Merge the mobile (`obsm`) and fixed (`obs`) obstacle codes.
///
/// Mobile obstacles map to `obsm + 1`, no obstacle at all to 1, fixed
/// obstacles to `obs + 10`, and anything else to [`UNKNOWN`].
pub fn obscar(obsm: Option<i64>, obs: Option<i64>) -> i64 {
    match (obsm, obs) {
        (Some(mobile), _) if mobile > 0 => mobile + 1,
        (_, Some(0)) => 1,
        (_, Some(fixed)) if fixed > 0 => fixed + FIXED_OBSTACLE_OFFSET,
        _ => UNKNOWN,
    }
}

/// Derive every feature on a copy of the joined table.
///
/// Adds `age`, `secu` and `obscar`, recodes `actp` and `nbv`, re-bases
/// `infra`, `choc`, `vosp` and `nbv`, and drops `an_nais`.
pub fn transform_features(joined: &DataFrame, options: &FeatureOptions) -> Result<DataFrame> {
    require_columns(
        joined,
        &[
            AN_NAIS, ACTP, NBV, INFRA, CHOC, VOSP, SECU1, SECU2, SECU3, OBS, OBSM,
        ],
    )?;

    let mut df = joined.clone();
    derive_age(&mut df, options.reference_year)?;
    recode_column(&mut df, ACTP, recode_actp)?;
    recode_column(&mut df, NBV, recode_nbv)?;
    for name in REBASED_COLUMNS {
        rebase_column(&mut df, name)?;
    }
    derive_secu(&mut df)?;
    derive_obscar(&mut df)?;

    debug!(
        rows = df.height(),
        columns = df.width(),
        reference_year = options.reference_year,
        "derived features"
    );
    Ok(df)
}

fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        if df.column(name).is_err() {
            return Err(TransformError::missing_column("joined", name));
        }
    }
    Ok(())
}

/// Read a column as optional integers; a present value that is not an
/// integer is a conversion error.
fn integer_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(column.len());
    for row in 0..column.len() {
        let cell = column.get(row)?;
        if is_blank(&cell) {
            values.push(None);
            continue;
        }
        match any_to_i64(cell.clone()) {
            Some(value) => values.push(Some(value)),
            None => return Err(conversion_error(name, row, cell)),
        }
    }
    Ok(values)
}

/// Null, or text holding only whitespace.
fn is_blank(cell: &AnyValue<'_>) -> bool {
    match cell {
        AnyValue::Null => true,
        AnyValue::String(text) => text.trim().is_empty(),
        AnyValue::StringOwned(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn conversion_error(name: &str, row: usize, cell: AnyValue<'_>) -> TransformError {
    TransformError::Conversion {
        column: name.to_string(),
        row,
        value: any_to_string(cell),
    }
}

fn derive_age(df: &mut DataFrame, reference_year: i64) -> Result<()> {
    let ages: Vec<i64> = integer_cells(df, AN_NAIS)?
        .into_iter()
        .map(|birth_year| age(reference_year, birth_year))
        .collect();
    let unknown = ages.iter().filter(|value| **value == UNKNOWN).count();
    debug!(unknown, "derived age");

    df.with_column(Column::new(AGE.into(), ages))?;
    df.drop_in_place(AN_NAIS)?;
    Ok(())
}

/// Apply a textual recoding rule; numeric cells already hold the code.
fn recode_column(df: &mut DataFrame, name: &str, rule: fn(&str) -> Option<i64>) -> Result<()> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(column.len());
    for row in 0..column.len() {
        let cell = column.get(row)?;
        if is_blank(&cell) {
            values.push(None);
            continue;
        }
        let code = match &cell {
            AnyValue::String(text) => rule(text),
            AnyValue::StringOwned(text) => rule(text),
            other => any_to_i64(other.clone()),
        };
        match code {
            Some(value) => values.push(Some(value)),
            None => return Err(conversion_error(name, row, cell)),
        }
    }
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

fn rebase_column(df: &mut DataFrame, name: &str) -> Result<()> {
    let values: Vec<Option<i64>> = integer_cells(df, name)?
        .into_iter()
        .map(|value| value.map(rebase))
        .collect();
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

fn derive_secu(df: &mut DataFrame) -> Result<()> {
    let first = integer_cells(df, SECU1)?;
    let second = integer_cells(df, SECU2)?;
    let third = integer_cells(df, SECU3)?;
    let secu: Vec<i64> = first
        .into_iter()
        .zip(second)
        .zip(third)
        .map(|((a, b), c)| secu_count([a, b, c]))
        .collect();
    df.with_column(Column::new(SECU.into(), secu))?;
    Ok(())
}

fn derive_obscar(df: &mut DataFrame) -> Result<()> {
    let mobile = integer_cells(df, OBSM)?;
    let fixed = integer_cells(df, OBS)?;
    let merged: Vec<i64> = mobile
        .into_iter()
        .zip(fixed)
        .map(|(obsm, obs)| obscar(obsm, obs))
        .collect();
    df.with_column(Column::new(OBSCAR.into(), merged))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined() -> DataFrame {
        df! {
            "an_nais" => [Some(1990i64), None, Some(2004)],
            "actp" => ["A", " -1", "3"],
            "nbv" => ["2", "#ERREUR", "0"],
            "infra" => [0i64, -1, 5],
            "choc" => [Some(1i64), Some(0), None],
            "vosp" => [0i64, 0, 3],
            "secu1" => [Some(0i64), Some(1), None],
            "secu2" => [Some(-1i64), Some(2), None],
            "secu3" => [Some(-1i64), Some(0), Some(-1)],
            "obs" => [-1i64, 0, 4],
            "obsm" => [3i64, -1, 0],
        }
        .unwrap()
    }

    fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
        df.column(name).unwrap().i64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_age() {
        assert_eq!(age(2022, Some(1990)), 32);
        assert_eq!(age(2022, None), UNKNOWN);
        assert_eq!(age(2019, Some(2019)), 0);
    }

    #[test]
    fn test_recode_actp() {
        assert_eq!(recode_actp("A"), Some(10));
        assert_eq!(recode_actp(" A"), Some(10));
        assert_eq!(recode_actp("B"), Some(-1));
        assert_eq!(recode_actp("-1"), Some(-1));
        assert_eq!(recode_actp(" -1"), Some(-1));
        assert_eq!(recode_actp("9"), Some(9));
        assert_eq!(recode_actp("Z"), None);
    }

    #[test]
    fn test_recode_nbv() {
        assert_eq!(recode_nbv("#ERREUR"), Some(-1));
        assert_eq!(recode_nbv(" -1"), Some(-1));
        assert_eq!(recode_nbv("4"), Some(4));
        assert_eq!(recode_nbv("deux"), None);
    }

    #[test]
    fn test_rebase() {
        assert_eq!(rebase(0), 1);
        assert_eq!(rebase(4), 5);
        assert_eq!(rebase(-1), -1);
    }

    #[test]
    fn test_secu_count() {
        assert_eq!(secu_count([Some(0), Some(-1), Some(-1)]), 1);
        assert_eq!(secu_count([Some(1), Some(2), Some(0)]), 3);
        assert_eq!(secu_count([Some(1), Some(2), Some(8)]), 4);
        assert_eq!(secu_count([None, None, Some(-1)]), UNKNOWN);
        assert_eq!(secu_count([None, Some(0), None]), 1);
    }

    #[test]
    fn test_obscar() {
        assert_eq!(obscar(Some(3), Some(-1)), 4);
        assert_eq!(obscar(Some(-1), Some(0)), 1);
        assert_eq!(obscar(Some(-1), Some(-1)), UNKNOWN);
        assert_eq!(obscar(Some(0), Some(4)), 14);
        assert_eq!(obscar(None, None), UNKNOWN);
    }

    #[test]
    fn test_transform_features() {
        let input = joined();
        let df = transform_features(&input, &FeatureOptions::default()).unwrap();

        assert_eq!(ints(&df, "age"), vec![Some(32), Some(-1), Some(18)]);
        assert!(df.column("an_nais").is_err());
        assert_eq!(ints(&df, "actp"), vec![Some(10), Some(-1), Some(3)]);
        assert_eq!(ints(&df, "nbv"), vec![Some(3), Some(-1), Some(1)]);
        assert_eq!(ints(&df, "infra"), vec![Some(1), Some(-1), Some(6)]);
        assert_eq!(ints(&df, "choc"), vec![Some(2), Some(1), None]);
        assert_eq!(ints(&df, "secu"), vec![Some(1), Some(3), Some(-1)]);
        assert_eq!(ints(&df, "obscar"), vec![Some(4), Some(1), Some(14)]);

        // Slot columns stay, input is untouched.
        assert!(df.column("secu1").is_ok());
        assert!(input.column("an_nais").is_ok());
        assert!(input.column("age").is_err());
    }

    #[test]
    fn test_reference_year_is_configurable() {
        let options = FeatureOptions {
            reference_year: 2019,
        };
        let df = transform_features(&joined(), &options).unwrap();
        assert_eq!(ints(&df, "age")[0], Some(29));
    }

    #[test]
    fn test_numeric_actp_passes_through() {
        let mut input = joined();
        input
            .with_column(Column::new("actp".into(), [Some(1i64), None, Some(-1)]))
            .unwrap();
        let df = transform_features(&input, &FeatureOptions::default()).unwrap();
        assert_eq!(ints(&df, "actp"), vec![Some(1), None, Some(-1)]);
    }

    #[test]
    fn test_unknown_actp_code_is_a_conversion_error() {
        let mut input = joined();
        input
            .with_column(Column::new("actp".into(), ["A", "Z", "1"]))
            .unwrap();
        let err = transform_features(&input, &FeatureOptions::default()).unwrap_err();
        match err {
            TransformError::Conversion { column, row, value } => {
                assert_eq!(column, "actp");
                assert_eq!(row, 1);
                assert_eq!(value, "Z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_text_reads_as_null() {
        let mut input = joined();
        input
            .with_column(Column::new("an_nais".into(), ["1990", " ", "2004"]))
            .unwrap();
        input
            .with_column(Column::new("actp".into(), ["", "A", "1"]))
            .unwrap();
        let df = transform_features(&input, &FeatureOptions::default()).unwrap();
        assert_eq!(ints(&df, "age"), vec![Some(32), Some(-1), Some(18)]);
        assert_eq!(ints(&df, "actp"), vec![None, Some(10), Some(1)]);
    }

    #[test]
    fn test_missing_input_column() {
        let input = joined().drop("obsm").unwrap();
        let err = transform_features(&input, &FeatureOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { column, .. } if column == "obsm"));
    }
}
