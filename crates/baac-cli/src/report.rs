//! Run report and table output files.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use baac_model::SourceTables;
use baac_transform::{ColumnAvailability, PipelineOptions, PipelineStats};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;

/// Separator of written tables, matching the published files.
pub const OUTPUT_SEPARATOR: u8 = b';';

/// Row count of one loaded source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: &'static str,
    pub rows: usize,
}

/// Machine-readable summary of a `run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub data_dir: PathBuf,
    pub vintage: u16,
    pub options: PipelineOptions,
    pub sources: Vec<SourceCount>,
    pub stats: PipelineStats,
    /// Availability of the selected columns before filtering.
    pub availability: Vec<ColumnAvailability>,
    pub output: Option<PathBuf>,
}

pub fn source_counts(tables: &SourceTables) -> Vec<SourceCount> {
    tables
        .row_counts()
        .into_iter()
        .map(|(kind, rows)| SourceCount {
            source: kind.label(),
            rows,
        })
        .collect()
}

/// Write the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(())
}

/// Write a table as `;`-separated text with a header row.
pub fn write_table(path: &Path, df: &DataFrame) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create output {}", path.display()))?;
    let mut df = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(OUTPUT_SEPARATOR)
        .finish(&mut df)
        .with_context(|| format!("failed to write output {}", path.display()))?;
    Ok(())
}
