//! The four BAAC source tables.

use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// One of the four files published for each vintage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// One row per accident (`caracteristiques`).
    Characteristics,
    /// One row per accident location (`lieux`).
    Locations,
    /// One row per person involved (`usagers`).
    Persons,
    /// One row per vehicle involved (`vehicules`).
    Vehicles,
}

impl SourceKind {
    /// All sources, in load order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Characteristics,
        SourceKind::Locations,
        SourceKind::Persons,
        SourceKind::Vehicles,
    ];

    /// File stem used by the data producer.
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Characteristics => "caracteristiques",
            Self::Locations => "lieux",
            Self::Persons => "usagers",
            Self::Vehicles => "vehicules",
        }
    }

    /// File name for a vintage, e.g. `usagers-2022.csv`.
    #[must_use]
    pub fn file_name(self, vintage: u16) -> String {
        format!("{}-{vintage}.csv", self.file_stem())
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Characteristics => "characteristics",
            Self::Locations => "locations",
            Self::Persons => "persons",
            Self::Vehicles => "vehicles",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four loaded tables of one vintage.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub characteristics: DataFrame,
    pub locations: DataFrame,
    pub persons: DataFrame,
    pub vehicles: DataFrame,
}

impl SourceTables {
    pub fn get(&self, kind: SourceKind) -> &DataFrame {
        match kind {
            SourceKind::Characteristics => &self.characteristics,
            SourceKind::Locations => &self.locations,
            SourceKind::Persons => &self.persons,
            SourceKind::Vehicles => &self.vehicles,
        }
    }

    /// Row count of every table, in [`SourceKind::ALL`] order.
    pub fn row_counts(&self) -> Vec<(SourceKind, usize)> {
        SourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind).height()))
            .collect()
    }
}
