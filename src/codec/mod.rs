//! Binary frequency files
//!
//! Persisted form of the index: one little-endian binary file per region plus
//! a CSV side file mapping species ids back to common names.
//!
//! ## Architecture
//!
//! - [`format`] - byte layout, encode and decode of one region
//! - [`writer`] - output tree layout, parent pruning, concurrent writes
//! - [`reader`] - region lookup, lazy name index, region listing
//! - [`name_index_file`] - `name,index` CSV load/save
//!
//! ## Output tree
//!
//! ```text
//! <out>/species_index.csv
//! <out>/US/US.bin
//! <out>/US/US-CA.bin
//! <out>/US/US-CA-001.bin
//! ```

pub mod format;
pub mod name_index_file;
pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use format::{decode_region, encode_region};
pub use name_index_file::{load_name_index, save_name_index};
pub use reader::FrequencyReader;
pub use writer::{FrequencyWriter, WriteSummary, pruned_regions, region_path};
