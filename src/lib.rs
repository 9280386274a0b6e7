//! eBird Frequency Index Library
//!
//! A Rust library for compiling large tab-delimited bird observation datasets
//! into compact per-region weekly frequency indexes.
//!
//! This library provides tools for:
//! - Mapping the dataset header onto semantic fields and parsing lines
//! - Aggregating sightings concurrently into 48 weekly buckets per region
//! - Flagging multi-year rarities against a reference year
//! - Consolidating sub-regions into country-level tables
//! - Writing and reading the little-endian binary region files

pub mod aggregator;
pub mod cli;
pub mod codec;
pub mod config;
pub mod consolidation;
pub mod constants;
pub mod ebd_parser;
pub mod error;
pub mod frequencies;
pub mod models;
pub mod processor;
pub mod rarity;

// Re-export commonly used types
pub use aggregator::{AggregationMode, FinalizedIndex, FrequencyAggregator, NameIndex, SpeciesFilter};
pub use codec::{FrequencyReader, FrequencyWriter, WriteSummary};
pub use config::IndexConfig;
pub use error::{IndexError, ParseError, Result};
pub use frequencies::{NamedFrequency, RegionFrequencies, SpeciesFrequency, WeekFrequencies};
pub use models::Observation;
pub use processor::{BuildReport, IndexBuilder, IngestStats, IngestionScheduler};
