//! Shared utilities for the BAAC pipeline crates.
//!
//! Holds the polars helpers every stage needs: reading a cell as an integer,
//! a float or text, and looking up columns by name.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_i64, any_to_string, column_names, format_numeric, has_column, parse_f64,
    parse_i64,
};
