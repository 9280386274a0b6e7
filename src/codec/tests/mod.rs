//! Tests for the binary codec
//!
//! Shared fixtures for format, writer and reader tests.


use crate::aggregator::NameIndex;
use crate::frequencies::{RegionFrequencies, SpeciesFrequency, WeekFrequencies};

/// Region with checklists in weeks 0 and 17 and one rarity
pub fn sample_region(code: &str) -> RegionFrequencies {
    let mut region = RegionFrequencies::empty(code, 5);
    region.weeks[0] = WeekFrequencies {
        checklists: 4,
        rarity_window: 5,
        species: vec![
            SpeciesFrequency {
                species_id: 0,
                frequency: 75.0,
                is_rarity: false,
                years_observed: 0,
            },
            SpeciesFrequency {
                species_id: 2,
                frequency: 25.0,
                is_rarity: true,
                years_observed: 2,
            },
        ],
    };
    region.weeks[17] = WeekFrequencies {
        checklists: 3,
        rarity_window: 5,
        species: vec![SpeciesFrequency {
            species_id: 1,
            frequency: 100.0 / 3.0,
            is_rarity: false,
            years_observed: 0,
        }],
    };
    region
}

/// Region with nothing recorded in any week
pub fn empty_region(code: &str) -> RegionFrequencies {
    RegionFrequencies::empty(code, 5)
}

/// Region whose only data is a rarity seen on incomplete checklists
pub fn rarity_only_region(code: &str) -> RegionFrequencies {
    let mut region = RegionFrequencies::empty(code, 5);
    region.weeks[3].species.push(SpeciesFrequency {
        species_id: 2,
        frequency: 0.0,
        is_rarity: true,
        years_observed: 1,
    });
    region
}

pub fn sample_names() -> NameIndex {
    let mut names = NameIndex::new();
    for name in ["Mallard", "Gadwall", "Ross's Gull"] {
        names.get_or_insert(name).unwrap();
    }
    names
}
