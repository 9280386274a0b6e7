//! Tests for the ingestion pipeline
//!
//! Helpers write small tab-delimited datasets to temporary directories.

mod builder_tests;
mod work_queue_tests;

use crate::config::IndexConfig;
use crate::ebd_parser::tests::{RowBuilder, full_header};
use std::path::{Path, PathBuf};

/// Default row with a species and checklist id
pub fn row(species: &str, checklist: &str) -> RowBuilder {
    RowBuilder {
        common_name: species.to_string(),
        checklist: checklist.to_string(),
        ..Default::default()
    }
}

/// Header plus raw lines, newline-terminated
pub fn write_raw_dataset(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("ebd_sample.txt");
    let mut text = full_header();
    text.push('\n');
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    std::fs::write(&path, text).unwrap();
    path
}

pub fn write_dataset(dir: &Path, rows: &[RowBuilder]) -> PathBuf {
    let lines: Vec<String> = rows.iter().map(RowBuilder::build).collect();
    write_raw_dataset(dir, &lines)
}

/// Small pool with tight water marks so backpressure kicks in
pub fn test_config(output_dir: &Path) -> IndexConfig {
    IndexConfig::default()
        .with_workers(4)
        .with_water_marks(8, 2)
        .with_output_dir(output_dir)
        .with_write_concurrency(2)
        .with_progress(false)
}
