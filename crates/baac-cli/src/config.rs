//! Optional TOML configuration.
//!
//! Every key is optional. Values given on the command line replace the file's,
//! and the file's replace the built-in defaults.
//!
//! ```toml
//! [ingest]
//! separator = ";"
//! decimal_comma = true
//!
//! [pipeline]
//! vintage = 2022
//! reference_year = 2022
//! strict_missing = true
//! features = ["place", "catu", "grav"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use baac_ingest::ReadOptions;
use baac_model::{DEFAULT_VINTAGE, SentinelPolicy};
use baac_transform::PipelineOptions;
use serde::{Deserialize, Serialize};

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub ingest: IngestSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestSettings {
    /// Single-character field separator; `"\t"` or `"tab"` for tabs.
    pub separator: Option<String>,
    pub decimal_comma: Option<bool>,
    pub low_memory: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    pub vintage: Option<u16>,
    pub reference_year: Option<i64>,
    /// Treat `0` as missing (the default).
    pub strict_missing: Option<bool>,
    pub features: Option<Vec<String>>,
}

/// Values taken from the command line; `None` defers to the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub vintage: Option<u16>,
    pub separator: Option<String>,
    pub decimal_comma: Option<bool>,
    pub low_memory: Option<bool>,
    pub reference_year: Option<i64>,
    pub strict_missing: Option<bool>,
    pub features: Option<Vec<String>>,
}

/// Settings after merging file, flags and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub vintage: u16,
    pub read: ReadOptions,
    pub pipeline: PipelineOptions,
}

/// Read and parse a configuration file.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let settings = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(settings)
}

impl Settings {
    pub fn resolve(&self, overrides: &Overrides) -> Result<ResolvedSettings> {
        let defaults = ReadOptions::default();
        let separator = match overrides
            .separator
            .as_deref()
            .or(self.ingest.separator.as_deref())
        {
            Some(value) => parse_separator(value)?,
            None => defaults.separator,
        };
        let decimal_comma = overrides
            .decimal_comma
            .or(self.ingest.decimal_comma)
            .unwrap_or(defaults.decimal_comma);
        let low_memory = overrides
            .low_memory
            .or(self.ingest.low_memory)
            .unwrap_or(defaults.low_memory);
        let read = defaults
            .with_separator(separator)
            .with_decimal_comma(decimal_comma)
            .with_low_memory(low_memory);

        let mut pipeline = PipelineOptions::default();
        if let Some(year) = overrides.reference_year.or(self.pipeline.reference_year) {
            pipeline.reference_year = year;
        }
        if let Some(strict) = overrides.strict_missing.or(self.pipeline.strict_missing) {
            pipeline.sentinel_policy = if strict {
                SentinelPolicy::Strict
            } else {
                SentinelPolicy::Lenient
            };
        }
        if let Some(features) = overrides
            .features
            .as_ref()
            .or(self.pipeline.features.as_ref())
        {
            if features.is_empty() {
                bail!("feature list is empty");
            }
            pipeline.features = features.clone();
        }

        Ok(ResolvedSettings {
            vintage: overrides
                .vintage
                .or(self.pipeline.vintage)
                .unwrap_or(DEFAULT_VINTAGE),
            read,
            pipeline,
        })
    }
}

/// Parse a field separator given as one ASCII character.
pub fn parse_separator(value: &str) -> Result<u8> {
    match value {
        "\\t" | "\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => bail!("separator must be a single ASCII character, got {value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator(";").unwrap(), b';');
        assert_eq!(parse_separator(",").unwrap(), b',');
        assert_eq!(parse_separator("tab").unwrap(), b'\t');
        assert!(parse_separator(";;").is_err());
        assert!(parse_separator("").is_err());
        assert!(parse_separator("é").is_err());
    }

    #[test]
    fn test_defaults_without_file_or_flags() {
        let resolved = Settings::default().resolve(&Overrides::default()).unwrap();
        assert_eq!(resolved.vintage, DEFAULT_VINTAGE);
        assert_eq!(resolved.read, ReadOptions::default());
        assert_eq!(resolved.pipeline, PipelineOptions::default());
    }

    #[test]
    fn test_empty_feature_list_is_rejected() {
        let overrides = Overrides {
            features: Some(Vec::new()),
            ..Overrides::default()
        };
        assert!(Settings::default().resolve(&overrides).is_err());
    }
}
