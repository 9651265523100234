//! Library components of the `baac` command-line tool.

pub mod config;
pub mod logging;
pub mod report;
