//! CLI argument definitions.

use std::path::PathBuf;

use baac_cli::config::Overrides;
use baac_transform::Stage;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "baac",
    version,
    about = "Prepare BAAC road accident files for severity modeling",
    long_about = "Join the four yearly BAAC files (caracteristiques, lieux, usagers, \
                  vehicules), derive model features and drop rows with missing values."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline on one vintage and print a stage summary.
    Run(RunArgs),

    /// Report per-column availability at a pipeline stage.
    Availability(AvailabilityArgs),

    /// List the default feature set.
    Features,
}

/// Where the files are and how to read and transform them.
#[derive(Args)]
pub struct SourceArgs {
    /// Folder holding the four files of the vintage.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Vintage to load, e.g. 2022 for `usagers-2022.csv`.
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<u16>,

    /// Year ages are computed against.
    #[arg(long = "reference-year", value_name = "YEAR")]
    pub reference_year: Option<i64>,

    /// Field separator (single character, or `tab`).
    #[arg(long = "separator", value_name = "CHAR")]
    pub separator: Option<String>,

    /// Decimals use a dot instead of a comma.
    #[arg(long = "no-decimal-comma")]
    pub no_decimal_comma: bool,

    /// Trade speed for lower memory use while reading.
    #[arg(long = "low-memory")]
    pub low_memory: bool,

    /// Keep rows holding `0`; only -1, empty and null values count as missing.
    #[arg(long = "lenient-missing")]
    pub lenient_missing: bool,

    /// Comma-separated feature columns to keep, label included.
    #[arg(long = "features", value_name = "NAMES", value_delimiter = ',')]
    pub features: Option<Vec<String>>,
}

impl SourceArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            vintage: self.year,
            separator: self.separator.clone(),
            decimal_comma: self.no_decimal_comma.then_some(false),
            low_memory: self.low_memory.then_some(true),
            reference_year: self.reference_year,
            strict_missing: self.lenient_missing.then_some(false),
            features: self.features.clone(),
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the filtered table to this file (`;`-separated).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a JSON run report to this file.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Print the first N rows of the filtered table.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,
}

#[derive(Args)]
pub struct AvailabilityArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Stage whose table is inspected.
    #[arg(long = "stage", value_enum, default_value = "selected")]
    pub stage: StageArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StageArg {
    Joined,
    Transformed,
    Selected,
}

impl From<StageArg> for Stage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Joined => Stage::Joined,
            StageArg::Transformed => Stage::Transformed,
            StageArg::Selected => Stage::Selected,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
