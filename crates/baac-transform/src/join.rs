//! Combining the four source tables into one row per road user.
//!
//! Persons are matched to their vehicle, then to the location and the
//! characteristics of the accident. All joins are inner joins, so a row only
//! survives when every source has a record for it.

use baac_common::has_column;
use baac_model::SourceTables;
use baac_model::schema::{ACCIDENT_ID, ID_VEHICULE, NUM_ACC};
use polars::prelude::*;
use tracing::debug;

use crate::error::{Result, TransformError};

/// Copy of the characteristics table keyed by `Num_Acc`.
///
/// Recent vintages publish the accident key as `Accident_Id`; older ones
/// already use `Num_Acc`, in which case the table is returned unchanged.
pub fn normalize_characteristics(characteristics: &DataFrame) -> Result<DataFrame> {
    let mut df = characteristics.clone();
    if has_column(&df, ACCIDENT_ID) {
        if has_column(&df, NUM_ACC) {
            df = df.drop(ACCIDENT_ID)?;
        } else {
            df.rename(ACCIDENT_ID, NUM_ACC.into())?;
        }
    } else if !has_column(&df, NUM_ACC) {
        return Err(TransformError::missing_column("characteristics", ACCIDENT_ID));
    }
    Ok(df)
}

/// Copy of the vehicles table without its accident key.
///
/// Persons already carry `Num_Acc`; keeping the vehicle copy would produce a
/// duplicated column after the join.
pub fn drop_vehicle_accident_key(vehicles: &DataFrame) -> Result<DataFrame> {
    if has_column(vehicles, NUM_ACC) {
        Ok(vehicles.drop(NUM_ACC)?)
    } else {
        Ok(vehicles.clone())
    }
}

/// Inner join of two tables on a single key.
///
/// Rows keep the order of `left`. Null keys never match. When the key dtypes
/// differ, both sides are compared as text.
pub fn inner_join(
    left: &DataFrame,
    left_table: &str,
    right: &DataFrame,
    right_table: &str,
    key: &str,
) -> Result<DataFrame> {
    let left_dtype = key_dtype(left, left_table, key)?;
    let right_dtype = key_dtype(right, right_table, key)?;

    let (left, right) = if left_dtype == right_dtype {
        (left.clone(), right.clone())
    } else {
        debug!(
            key,
            left = %left_dtype,
            right = %right_dtype,
            "join key dtypes differ, comparing as text"
        );
        (key_as_text(left, key)?, key_as_text(right, key)?)
    };

    let mut args = JoinArgs::new(JoinType::Inner);
    args.maintain_order = MaintainOrderJoin::Left;
    let joined = left
        .lazy()
        .join(right.lazy(), [col(key)], [col(key)], args)
        .collect()?;
    Ok(joined)
}

fn key_dtype(df: &DataFrame, table: &str, key: &str) -> Result<DataType> {
    df.column(key)
        .map(|column| column.dtype().clone())
        .map_err(|_| TransformError::missing_column(table, key))
}

fn key_as_text(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let mut df = df.clone();
    let text = df.column(key)?.cast(&DataType::String)?;
    df.with_column(text)?;
    Ok(df)
}

/// Join persons, vehicles, locations and characteristics.
pub fn join_sources(tables: &SourceTables) -> Result<DataFrame> {
    let vehicles = drop_vehicle_accident_key(&tables.vehicles)?;
    let characteristics = normalize_characteristics(&tables.characteristics)?;

    let joined = inner_join(&tables.persons, "persons", &vehicles, "vehicles", ID_VEHICULE)?;
    debug!(rows = joined.height(), "joined persons with vehicles");

    let joined = inner_join(&joined, "joined", &tables.locations, "locations", NUM_ACC)?;
    debug!(rows = joined.height(), "joined locations");

    let joined = inner_join(
        &joined,
        "joined",
        &characteristics,
        "characteristics",
        NUM_ACC,
    )?;
    debug!(rows = joined.height(), "joined characteristics");

    Ok(joined)
}
