//! Accumulation tables for one region.

use crate::constants::WEEKS_PER_YEAR;
use crate::frequencies::{RegionFrequencies, SpeciesFrequency, WeekFrequencies};
use crate::rarity::{RarityPolicy, RarityTracker};
use std::collections::{HashMap, HashSet};

/// Per (region, week, species) accumulator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesStats {
    /// Complete checklists reporting the species
    pub occurrence_count: u32,
    pub rarity: RarityTracker,
}

/// One of the 48 buckets of a region
#[derive(Debug, Clone, Default)]
pub struct WeekBucket {
    checklists: HashSet<String>,
    species: HashMap<u16, SpeciesStats>,
}

impl WeekBucket {
    /// Distinct complete checklists seen this week
    pub fn checklist_count(&self) -> usize {
        self.checklists.len()
    }

    pub fn species(&self, species_id: u16) -> Option<&SpeciesStats> {
        self.species.get(&species_id)
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn iter_species(&self) -> impl Iterator<Item = (u16, &SpeciesStats)> {
        self.species.iter().map(|(id, stats)| (*id, stats))
    }
}

/// Region code -> 48 week buckets
#[derive(Debug, Clone)]
pub struct RegionFrequencyTable {
    region_code: String,
    weeks: Vec<WeekBucket>,
}

impl RegionFrequencyTable {
    pub fn new(region_code: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            weeks: vec![WeekBucket::default(); WEEKS_PER_YEAR],
        }
    }

    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    pub fn week(&self, week: usize) -> Option<&WeekBucket> {
        self.weeks.get(week)
    }

    /// Fold one sighting into the table. Every sighting feeds the rarity
    /// tracker; only complete checklists count toward frequencies.
    pub fn record(
        &mut self,
        week: usize,
        species_id: u16,
        year: i32,
        complete_checklist: Option<&str>,
        policy: &RarityPolicy,
    ) {
        let bucket = &mut self.weeks[week];
        let stats = bucket.species.entry(species_id).or_default();
        stats.rarity.record_year(year, policy);

        if let Some(checklist_id) = complete_checklist {
            if !bucket.checklists.contains(checklist_id) {
                bucket.checklists.insert(checklist_id.to_string());
            }
            stats.occurrence_count += 1;
        }
    }

    pub fn finalize(&mut self, reference_year: i32, policy: &RarityPolicy) {
        for bucket in &mut self.weeks {
            for stats in bucket.species.values_mut() {
                stats.rarity.finalize(reference_year, policy);
            }
        }
    }

    pub fn total_checklists(&self) -> usize {
        self.weeks.iter().map(WeekBucket::checklist_count).sum()
    }

    /// Convert counts to percentages. Rarity fields reflect the last
    /// [`finalize`](Self::finalize).
    pub fn to_frequencies(&self, policy: &RarityPolicy) -> RegionFrequencies {
        let weeks = self
            .weeks
            .iter()
            .map(|bucket| {
                let checklists = bucket.checklist_count();
                let mut week = WeekFrequencies {
                    checklists: u32::try_from(checklists).unwrap_or(u32::MAX),
                    rarity_window: policy.years_to_check,
                    species: bucket
                        .species
                        .iter()
                        .map(|(&species_id, stats)| SpeciesFrequency {
                            species_id,
                            frequency: percent(stats.occurrence_count, checklists),
                            is_rarity: stats.rarity.is_rarity(),
                            years_observed: if stats.rarity.is_rarity() {
                                stats.rarity.years_observed_in_window()
                            } else {
                                0
                            },
                        })
                        .collect(),
                };
                week.sort();
                week
            })
            .collect();

        RegionFrequencies {
            region_code: self.region_code.clone(),
            weeks,
        }
    }
}

fn percent(occurrences: u32, checklists: usize) -> f64 {
    if checklists == 0 {
        0.0
    } else {
        f64::from(occurrences) / checklists as f64 * 100.0
    }
}
