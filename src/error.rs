//! Error types for the fallible parts of the crate.
//!
//! Calculations never fail; validation problems are reported inside
//! [`CalculationResult`](crate::models::CalculationResult).  The types
//! here cover loading configuration and building reports.

use thiserror::Error;

/// Errors raised while loading or checking a configuration table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration table: {0}")]
    InvalidTable(String),
}

/// Errors raised while building a lead-capture report.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("a client name is required")]
    MissingClientName,
    #[error("cannot build a report from invalid inputs: {}", .0.join("; "))]
    InvalidInputs(Vec<String>),
}
