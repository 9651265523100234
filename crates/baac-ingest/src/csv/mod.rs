//! Delimited-file reading.

mod options;
mod reader;

pub use options::ReadOptions;
pub use reader::read_table;
