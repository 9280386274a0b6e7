//! Tab-delimited observation dataset parser
//!
//! Turns the header line into a column map and each data line into an
//! [`Observation`](crate::models::Observation). Parsing is line-at-a-time
//! so the ingestion scheduler can hand every line to a separate worker.
//!
//! ## Architecture
//!
//! - [`column_mapping`] - Header analysis, semantic field to column index
//! - [`record_parser`] - Individual line processing
//! - [`field_parsers`] - Helpers for typed field extraction
//! - [`stats`] - Parsing statistics
//!
//! ## Usage
//!
//! ```rust
//! use ebd_frequency::ebd_parser::{ColumnMapping, parse_observation_line};
//!
//! let header = "COMMON NAME\tSAMPLING EVENT IDENTIFIER\tCOUNTRY CODE\tOBSERVATION DATE";
//! let mapping = ColumnMapping::analyze(header).unwrap();
//! let observation = parse_observation_line("Mallard\tS1\tUS\t2020-05-01", &mapping).unwrap();
//! assert_eq!(observation.region_code, "US");
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod record_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnMapping, Field};
pub use record_parser::{parse_observation_bytes, parse_observation_line};
pub use stats::ParseStats;
