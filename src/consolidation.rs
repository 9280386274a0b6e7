//! Regional consolidation.
//!
//! Folds every sub-region of a country into one country-level table when
//! the country is not wanted at sub-region detail. Percentages are turned
//! back into checklist counts using each sub-region's own denominator,
//! summed, and divided by the summed checklist total; percentages are never
//! averaged directly.

use crate::constants::{WEEKS_PER_YEAR, country_of};
use crate::frequencies::{RegionFrequencies, SpeciesFrequency, WeekFrequencies};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
struct SpeciesAccumulator {
    occurrences: f64,
    rare_everywhere: bool,
    years_observed: u8,
}

#[derive(Debug, Clone, Default)]
struct WeekAccumulator {
    checklists: u64,
    rarity_window: Option<u8>,
    species: HashMap<u16, SpeciesAccumulator>,
}

/// Running per-country totals while sub-regions are folded together
#[derive(Debug, Clone)]
pub struct ConsolidationAccumulator {
    region_code: String,
    weeks: Vec<WeekAccumulator>,
    merged_regions: usize,
}

impl ConsolidationAccumulator {
    pub fn new(region_code: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            weeks: vec![WeekAccumulator::default(); WEEKS_PER_YEAR],
            merged_regions: 0,
        }
    }

    pub fn merged_regions(&self) -> usize {
        self.merged_regions
    }

    /// Add one sub-region's table
    pub fn add(&mut self, region: &RegionFrequencies) {
        for (accumulator, week) in self.weeks.iter_mut().zip(&region.weeks) {
            accumulator.checklists += u64::from(week.checklists);

            match accumulator.rarity_window {
                None => accumulator.rarity_window = Some(week.rarity_window),
                Some(window) if window != week.rarity_window => warn!(
                    "Rarity window mismatch folding {} into {}: {} vs {}",
                    region.region_code, self.region_code, week.rarity_window, window
                ),
                Some(_) => {}
            }

            for entry in &week.species {
                let occurrences = week.occurrences(entry);
                accumulator
                    .species
                    .entry(entry.species_id)
                    .and_modify(|acc| {
                        acc.occurrences += occurrences;
                        acc.rare_everywhere &= entry.is_rarity;
                        acc.years_observed = acc.years_observed.max(entry.years_observed);
                    })
                    .or_insert(SpeciesAccumulator {
                        occurrences,
                        rare_everywhere: entry.is_rarity,
                        years_observed: entry.years_observed,
                    });
            }
        }
        self.merged_regions += 1;
    }

    /// Reconvert summed counts to percentages of the summed checklist total
    pub fn finish(self) -> RegionFrequencies {
        let weeks = self
            .weeks
            .into_iter()
            .map(|week| {
                let checklists = week.checklists;
                let mut merged = WeekFrequencies {
                    checklists: u32::try_from(checklists).unwrap_or(u32::MAX),
                    rarity_window: week.rarity_window.unwrap_or_default(),
                    species: week
                        .species
                        .into_iter()
                        .map(|(species_id, acc)| SpeciesFrequency {
                            species_id,
                            frequency: if checklists == 0 {
                                0.0
                            } else {
                                acc.occurrences / checklists as f64 * 100.0
                            },
                            is_rarity: acc.rare_everywhere,
                            years_observed: if acc.rare_everywhere {
                                acc.years_observed
                            } else {
                                0
                            },
                        })
                        .collect(),
                };
                merged.sort();
                merged
            })
            .collect();

        RegionFrequencies {
            region_code: self.region_code,
            weeks,
        }
    }
}

/// Merge a set of sub-region tables into one table for `region_code`
pub fn consolidate(region_code: &str, regions: &[RegionFrequencies]) -> RegionFrequencies {
    let mut accumulator = ConsolidationAccumulator::new(region_code);
    for region in regions {
        accumulator.add(region);
    }
    accumulator.finish()
}

/// Fold every region of the listed countries into a single country-level
/// table; regions of other countries pass through untouched. Output is
/// ordered by region code.
pub fn consolidate_countries(
    regions: Vec<RegionFrequencies>,
    countries: &[String],
) -> Vec<RegionFrequencies> {
    if countries.is_empty() {
        return regions;
    }

    let wanted: HashSet<&str> = countries.iter().map(String::as_str).collect();
    let mut accumulators: BTreeMap<String, ConsolidationAccumulator> = BTreeMap::new();
    let mut output = Vec::with_capacity(regions.len());

    for region in regions {
        let country = country_of(&region.region_code);
        if wanted.contains(country) {
            accumulators
                .entry(country.to_string())
                .or_insert_with(|| ConsolidationAccumulator::new(country))
                .add(&region);
        } else {
            output.push(region);
        }
    }

    for (country, accumulator) in accumulators {
        debug!(
            "Consolidated {} regions into {}",
            accumulator.merged_regions(),
            country
        );
        output.push(accumulator.finish());
    }

    info!("Consolidated {} countries", countries.len());
    output.sort_by(|a, b| a.region_code.cmp(&b.region_code));
    output
}
