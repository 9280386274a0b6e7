//! Tests for region tables and frequency conversion

use crate::aggregator::RegionFrequencyTable;
use crate::rarity::RarityPolicy;

#[test]
fn test_new_table_has_48_empty_weeks() {
    let table = RegionFrequencyTable::new("US-CA");
    assert_eq!(table.region_code(), "US-CA");
    assert!(table.week(47).is_some());
    assert!(table.week(48).is_none());
    assert_eq!(table.total_checklists(), 0);

    let frequencies = table.to_frequencies(&RarityPolicy::default());
    assert_eq!(frequencies.weeks.len(), 48);
    assert!(frequencies.has_no_checklists());
    assert_eq!(frequencies.weeks[0].rarity_window, 5);
}

#[test]
fn test_incomplete_only_species_has_zero_frequency() {
    let policy = RarityPolicy::default();
    let mut table = RegionFrequencyTable::new("US-CA");
    table.record(10, 0, 2020, Some("S1"), &policy);
    table.record(10, 1, 2020, None, &policy);

    let frequencies = table.to_frequencies(&policy);
    let week = &frequencies.weeks[10];
    assert_eq!(week.checklists, 1);
    assert_eq!(week.find(0).unwrap().frequency, 100.0);
    assert_eq!(week.find(1).unwrap().frequency, 0.0);
}

#[test]
fn test_week_without_checklists_has_zero_frequency() {
    let policy = RarityPolicy::default();
    let mut table = RegionFrequencyTable::new("US-CA");
    table.record(3, 0, 2020, None, &policy);

    let frequencies = table.to_frequencies(&policy);
    assert_eq!(frequencies.weeks[3].checklists, 0);
    assert_eq!(frequencies.weeks[3].species[0].frequency, 0.0);
}

#[test]
fn test_rarity_fields_follow_finalize() {
    let policy = RarityPolicy::default();
    let mut table = RegionFrequencyTable::new("US-CA");
    table.record(0, 0, 2018, Some("S1"), &policy);
    for year in 2016..=2020 {
        table.record(0, 1, year, Some("S2"), &policy);
    }
    table.finalize(2020, &policy);

    let week = table.to_frequencies(&policy).weeks[0].clone();
    let rare = week.find(0).unwrap();
    let common = week.find(1).unwrap();

    assert!(rare.is_rarity);
    assert_eq!(rare.years_observed, 1);
    assert!(!common.is_rarity);
    assert_eq!(common.years_observed, 0);
}

#[test]
fn test_species_entries_sorted_by_id() {
    let policy = RarityPolicy::default();
    let mut table = RegionFrequencyTable::new("US-CA");
    for id in [9, 2, 5, 0] {
        table.record(20, id, 2020, Some("S1"), &policy);
    }

    let ids: Vec<u16> = table.to_frequencies(&policy).weeks[20]
        .species
        .iter()
        .map(|s| s.species_id)
        .collect();
    assert_eq!(ids, vec![0, 2, 5, 9]);
}
