//! End-to-end pipeline from the four source tables to a filtered feature table.
//!
//! Stages run in a fixed order: join, feature derivation, selection, then
//! missing-value filtering. Every stage returns a new frame, so the output
//! keeps a snapshot of each one.

use std::time::Instant;

use baac_model::schema::ID_USAGER;
use baac_model::{DEFAULT_REFERENCE_YEAR, SentinelPolicy, SourceTables, default_features};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::error::Result;
use crate::features::{FeatureOptions, transform_features};
use crate::filter::remove_missing_values;
use crate::join::join_sources;
use crate::select::select_features;

/// Configuration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub reference_year: i64,
    /// Columns kept after derivation, label included.
    pub features: Vec<String>,
    pub sentinel_policy: SentinelPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            features: default_features(),
            sentinel_policy: SentinelPolicy::default(),
        }
    }
}

impl PipelineOptions {
    pub fn feature_options(&self) -> FeatureOptions {
        FeatureOptions {
            reference_year: self.reference_year,
        }
    }
}

/// Pipeline stage whose output is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Joined,
    Transformed,
    Selected,
    Filtered,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Joined,
        Stage::Transformed,
        Stage::Selected,
        Stage::Filtered,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Joined => "joined",
            Self::Transformed => "transformed",
            Self::Selected => "selected",
            Self::Filtered => "filtered",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Row and column counts of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub joined_rows: usize,
    pub transformed_rows: usize,
    pub selected_rows: usize,
    pub filtered_rows: usize,
    /// Columns of the filtered table.
    pub columns: usize,
    /// Distinct road users in the joined table, when `id_usager` is present.
    pub distinct_persons: Option<usize>,
}

impl PipelineStats {
    /// Rows removed by the missing-value filter.
    pub fn dropped_rows(&self) -> usize {
        self.selected_rows - self.filtered_rows
    }

    pub fn rows(&self, stage: Stage) -> usize {
        match stage {
            Stage::Joined => self.joined_rows,
            Stage::Transformed => self.transformed_rows,
            Stage::Selected => self.selected_rows,
            Stage::Filtered => self.filtered_rows,
        }
    }
}

/// Snapshots of every stage.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub joined: DataFrame,
    pub transformed: DataFrame,
    pub selected: DataFrame,
    pub filtered: DataFrame,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    pub fn stage(&self, stage: Stage) -> &DataFrame {
        match stage {
            Stage::Joined => &self.joined,
            Stage::Transformed => &self.transformed,
            Stage::Selected => &self.selected,
            Stage::Filtered => &self.filtered,
        }
    }
}

/// Run every stage on the loaded source tables.
pub fn run_pipeline(tables: &SourceTables, options: &PipelineOptions) -> Result<PipelineOutput> {
    let joined = run_stage(Stage::Joined, || join_sources(tables))?;
    let distinct_persons = match joined.column(ID_USAGER) {
        Ok(column) => Some(column.as_materialized_series().n_unique()?),
        Err(_) => None,
    };

    let feature_options = options.feature_options();
    let transformed = run_stage(Stage::Transformed, || {
        transform_features(&joined, &feature_options)
    })?;
    let selected = run_stage(Stage::Selected, || {
        select_features(&transformed, &options.features)
    })?;
    let filtered = run_stage(Stage::Filtered, || {
        remove_missing_values(&selected, options.sentinel_policy)
    })?;

    let stats = PipelineStats {
        joined_rows: joined.height(),
        transformed_rows: transformed.height(),
        selected_rows: selected.height(),
        filtered_rows: filtered.height(),
        columns: filtered.width(),
        distinct_persons,
    };
    info!(
        rows = stats.filtered_rows,
        columns = stats.columns,
        dropped = stats.dropped_rows(),
        policy = options.sentinel_policy.label(),
        "pipeline complete"
    );

    Ok(PipelineOutput {
        joined,
        transformed,
        selected,
        filtered,
        stats,
    })
}

fn run_stage(stage: Stage, run: impl FnOnce() -> Result<DataFrame>) -> Result<DataFrame> {
    let span = info_span!("stage", stage = %stage);
    let _guard = span.enter();
    let start = Instant::now();
    let df = run()?;
    info!(
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "stage complete"
    );
    Ok(df)
}
