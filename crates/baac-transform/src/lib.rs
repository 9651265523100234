//! BAAC accident pipeline stages.
//!
//! Joins the four source tables, derives model features, keeps the selected
//! columns and drops rows with missing values. [`run_pipeline`] chains the
//! stages; each one is also usable on its own.
//!
//! # Example
//!
//! ```ignore
//! use baac_transform::{PipelineOptions, run_pipeline};
//!
//! let output = run_pipeline(&tables, &PipelineOptions::default())?;
//! println!("{} rows ready", output.stats.filtered_rows);
//! ```

pub mod availability;
pub mod error;
pub mod features;
pub mod filter;
pub mod join;
pub mod pipeline;
pub mod reduce;
pub mod select;

pub use availability::{
    ColumnAvailability, availability, availability_report, column_availability,
};
pub use error::{Result, TransformError};
pub use features::{FeatureOptions, transform_features};
pub use filter::{remove_missing_values, sentinel_flags};
pub use join::join_sources;
pub use pipeline::{PipelineOptions, PipelineOutput, PipelineStats, Stage, run_pipeline};
pub use reduce::{FeatureMatrix, ReductionError, Reducer, reduce_features, split_label};
pub use select::select_features;
