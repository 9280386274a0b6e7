//! Tests for the complete build pipeline

use super::{row, test_config, write_dataset};
use crate::IndexError;
use crate::codec::FrequencyReader;
use crate::config::IndexConfig;
use crate::ebd_parser::tests::RowBuilder;
use crate::processor::IndexBuilder;
use tempfile::TempDir;

fn state_row(species: &str, checklist: &str, state: &str) -> RowBuilder {
    RowBuilder {
        state: state.to_string(),
        county: String::new(),
        ..row(species, checklist)
    }
}

#[tokio::test]
async fn test_build_writes_readable_index() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index");
    let source = write_dataset(
        dir.path(),
        &[row("Mallard", "S1"), row("Gadwall", "S1"), row("Mallard", "S2")],
    );

    let report = IndexBuilder::new(&source, test_config(&out))
        .unwrap()
        .build()
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.write.regions_written, 1);
    assert_eq!(report.ingest.parse.observations_parsed, 3);
    assert_eq!(report.output_dir, out);

    let reader = FrequencyReader::new(&out);
    assert_eq!(reader.available_regions().unwrap(), vec!["US-CA-001".to_string()]);

    let week = reader.week_species("US-CA-001", 17).unwrap();
    assert_eq!(week.len(), 2);
    assert_eq!(week[0].name, "Mallard");
    assert_eq!(week[0].frequency, 100.0);
    assert_eq!(week[1].name, "Gadwall");
    assert_eq!(week[1].frequency, 50.0);
    assert_eq!(reader.checklist_counts("US-CA-001").unwrap()[17], 2);
}

#[tokio::test]
async fn test_build_consolidates_countries() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index");
    let mut mexico = state_row("Mallard", "S9", "MX-ROO");
    mexico.country = "MX".to_string();

    let source = write_dataset(
        dir.path(),
        &[
            state_row("Mallard", "S1", "US-CA"),
            state_row("Mallard", "S2", "US-NV"),
            state_row("Gadwall", "S2", "US-NV"),
            mexico,
        ],
    );

    let config = test_config(&out).with_consolidated_countries(["US"]);
    let report = IndexBuilder::new(&source, config)
        .unwrap()
        .build()
        .await
        .unwrap();
    assert!(report.success());

    let reader = FrequencyReader::new(&out);
    assert_eq!(
        reader.available_regions().unwrap(),
        vec!["MX-ROO".to_string(), "US".to_string()]
    );

    let us = reader.week_species("US", 17).unwrap();
    let mallard = us.iter().find(|s| s.name == "Mallard").unwrap();
    let gadwall = us.iter().find(|s| s.name == "Gadwall").unwrap();
    assert!((mallard.frequency - 100.0).abs() < 1e-9);
    assert!((gadwall.frequency - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_country_without_subdivisions_uses_fallback_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index");
    let mut bare = row("Mallard", "S1");
    bare.country = "BM".to_string();
    bare.state = String::new();
    bare.county = String::new();
    let source = write_dataset(dir.path(), &[bare]);

    IndexBuilder::new(&source, test_config(&out))
        .unwrap()
        .build()
        .await
        .unwrap();

    assert!(out.join("BM/BM.bin").is_file());
}

#[test]
fn test_builder_rejects_bad_setup() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        IndexBuilder::new(dir.path().join("missing.txt"), test_config(dir.path())),
        Err(IndexError::SourceNotFound { .. })
    ));

    let source = write_dataset(dir.path(), &[row("Mallard", "S1")]);
    assert!(matches!(
        IndexBuilder::new(&source, IndexConfig::default().with_workers(0)),
        Err(IndexError::Configuration { .. })
    ));
}
