//! Locating and loading the four source tables of a vintage.

use std::path::{Path, PathBuf};

use baac_model::{SourceKind, SourceTables};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::csv::{ReadOptions, read_table};
use crate::error::{IngestError, Result};

/// Paths of the four source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub characteristics: PathBuf,
    pub locations: PathBuf,
    pub persons: PathBuf,
    pub vehicles: PathBuf,
}

impl SourcePaths {
    /// Paths following the producer's naming, e.g. `<dir>/lieux-2022.csv`.
    pub fn for_vintage(dir: &Path, vintage: u16) -> Self {
        Self {
            characteristics: dir.join(SourceKind::Characteristics.file_name(vintage)),
            locations: dir.join(SourceKind::Locations.file_name(vintage)),
            persons: dir.join(SourceKind::Persons.file_name(vintage)),
            vehicles: dir.join(SourceKind::Vehicles.file_name(vintage)),
        }
    }

    pub fn get(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Characteristics => &self.characteristics,
            SourceKind::Locations => &self.locations,
            SourceKind::Persons => &self.persons,
            SourceKind::Vehicles => &self.vehicles,
        }
    }

    /// Replace the path of one source.
    pub fn with_path(mut self, kind: SourceKind, path: PathBuf) -> Self {
        match kind {
            SourceKind::Characteristics => self.characteristics = path,
            SourceKind::Locations => self.locations = path,
            SourceKind::Persons => self.persons = path,
            SourceKind::Vehicles => self.vehicles = path,
        }
        self
    }

    /// Sources whose file is not present on disk.
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| !self.get(*kind).is_file())
            .collect()
    }
}

/// Load all four tables, stopping at the first failure.
pub fn load_sources(paths: &SourcePaths, options: &ReadOptions) -> Result<SourceTables> {
    let load = |kind: SourceKind| {
        read_table(paths.get(kind), options).map_err(|source| IngestError::Source {
            kind,
            source: Box::new(source),
        })
    };

    let tables = SourceTables {
        characteristics: load(SourceKind::Characteristics)?,
        locations: load(SourceKind::Locations)?,
        persons: load(SourceKind::Persons)?,
        vehicles: load(SourceKind::Vehicles)?,
    };

    for (kind, rows) in tables.row_counts() {
        info!(source = %kind, rows, "source table loaded");
    }
    Ok(tables)
}
