//! BAAC data ingestion.
//!
//! Reads the four delimited files published for each vintage
//! (`caracteristiques`, `lieux`, `usagers`, `vehicules`) into polars frames.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use baac_ingest::{ReadOptions, SourcePaths, load_sources};
//!
//! let paths = SourcePaths::for_vintage(Path::new("data"), 2022);
//! let tables = load_sources(&paths, &ReadOptions::default())?;
//! ```

mod csv;
mod error;
mod sources;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Reading ===
pub use csv::{ReadOptions, read_table};

// === Source Tables ===
pub use sources::{SourcePaths, load_sources};
