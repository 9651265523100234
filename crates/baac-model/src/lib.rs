//! BAAC accident data model.
//!
//! Names the four source tables, the columns the pipeline relies on, and the
//! sentinel convention used to mark absent values.

pub mod schema;
pub mod sentinel;
pub mod source;

pub use schema::{DEFAULT_REFERENCE_YEAR, DEFAULT_VINTAGE, FEATURES, LABEL, default_features};
pub use sentinel::{SentinelPolicy, UNKNOWN};
pub use source::{SourceKind, SourceTables};
