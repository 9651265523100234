use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use baac_cli::config::{ResolvedSettings, Settings};
use baac_cli::report::{RunReport, source_counts, write_report, write_table};
use baac_ingest::{SourcePaths, load_sources};
use baac_model::SourceTables;
use baac_transform::{
    ColumnAvailability, PipelineOutput, Stage, availability_report, join_sources, run_pipeline,
    select_features, transform_features,
};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::cli::{AvailabilityArgs, RunArgs, SourceArgs};

/// What `run` produced, for the summary.
pub struct RunOutcome {
    pub data_dir: PathBuf,
    pub resolved: ResolvedSettings,
    pub tables: SourceTables,
    pub output: PipelineOutput,
    pub written: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub preview: Option<DataFrame>,
}

/// Result of `availability`.
pub struct AvailabilityOutcome {
    pub stage: Stage,
    pub rows: usize,
    pub columns: Vec<ColumnAvailability>,
}

fn load(args: &SourceArgs, settings: &Settings) -> Result<(ResolvedSettings, SourceTables)> {
    let resolved = settings.resolve(&args.overrides())?;
    let paths = SourcePaths::for_vintage(&args.data_dir, resolved.vintage);

    let span = info_span!(
        "ingest",
        vintage = resolved.vintage,
        data_dir = %args.data_dir.display()
    );
    let _guard = span.enter();
    let start = Instant::now();
    let tables = load_sources(&paths, &resolved.read).with_context(|| {
        format!(
            "failed to load the {} files from {}",
            resolved.vintage,
            args.data_dir.display()
        )
    })?;
    info!(
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok((resolved, tables))
}

pub fn run(args: &RunArgs, settings: &Settings) -> Result<RunOutcome> {
    let (resolved, tables) = load(&args.source, settings)?;
    let output = run_pipeline(&tables, &resolved.pipeline).context("pipeline failed")?;

    if let Some(path) = &args.output {
        write_table(path, &output.filtered)?;
        info!(path = %path.display(), rows = output.filtered.height(), "wrote filtered table");
    }

    if let Some(path) = &args.report {
        let availability = availability_report(&output.selected, resolved.pipeline.sentinel_policy)
            .context("availability report failed")?;
        let report = RunReport {
            data_dir: args.source.data_dir.clone(),
            vintage: resolved.vintage,
            options: resolved.pipeline.clone(),
            sources: source_counts(&tables),
            stats: output.stats.clone(),
            availability,
            output: args.output.clone(),
        };
        write_report(path, &report)?;
        info!(path = %path.display(), "wrote run report");
    }

    let preview = args.preview.map(|rows| output.filtered.head(Some(rows)));
    Ok(RunOutcome {
        data_dir: args.source.data_dir.clone(),
        resolved,
        tables,
        output,
        written: args.output.clone(),
        report: args.report.clone(),
        preview,
    })
}

/// Runs the stages up to the requested one only.
pub fn availability(args: &AvailabilityArgs, settings: &Settings) -> Result<AvailabilityOutcome> {
    let (resolved, tables) = load(&args.source, settings)?;
    let options = &resolved.pipeline;
    let stage = Stage::from(args.stage);

    let df = join_sources(&tables).context("join failed")?;
    let df = if stage == Stage::Joined {
        df
    } else {
        let transformed = transform_features(&df, &options.feature_options())
            .context("feature derivation failed")?;
        if stage == Stage::Selected {
            select_features(&transformed, &options.features).context("selection failed")?
        } else {
            transformed
        }
    };

    let columns = availability_report(&df, options.sentinel_policy)
        .context("availability report failed")?;
    Ok(AvailabilityOutcome {
        stage,
        rows: df.height(),
        columns,
    })
}
