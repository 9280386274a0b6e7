//! Per-region weekly frequency tables in their persisted form.
//!
//! This is what the binary codec writes and reads and what the regional
//! consolidator merges: percentages per species per week, the week's
//! complete-checklist count, and finalized rarity flags.

use crate::aggregator::NameIndex;
use crate::constants::{MAX_STORED_CHECKLISTS, WEEKS_PER_YEAR};
use serde::Serialize;

/// One species entry within a week
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeciesFrequency {
    pub species_id: u16,
    /// Percent of the week's complete checklists reporting the species
    pub frequency: f64,
    pub is_rarity: bool,
    /// Window years the species was seen in; zero unless `is_rarity`
    pub years_observed: u8,
}

/// One week bucket of a region
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeekFrequencies {
    pub checklists: u32,
    pub rarity_window: u8,
    pub species: Vec<SpeciesFrequency>,
}

impl WeekFrequencies {
    /// Absolute number of checklists reporting a species.
    ///
    /// Frequencies are computed from the true checklist count before it is
    /// stored. On a week read back with [`is_saturated`](Self::is_saturated)
    /// set, the result is scaled to the capped count and undercounts.
    pub fn occurrences(&self, entry: &SpeciesFrequency) -> f64 {
        entry.frequency / 100.0 * f64::from(self.checklists)
    }

    /// Checklist count is at the stored maximum, so the true count may be higher
    pub fn is_saturated(&self) -> bool {
        self.checklists >= MAX_STORED_CHECKLISTS
    }

    pub fn find(&self, species_id: u16) -> Option<&SpeciesFrequency> {
        self.species.iter().find(|s| s.species_id == species_id)
    }

    /// Sort entries by species id for stable output
    pub fn sort(&mut self) {
        self.species.sort_by_key(|s| s.species_id);
    }
}

/// Species entry with its common name resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFrequency {
    pub name: String,
    pub frequency: f64,
    pub is_rarity: bool,
    pub years_observed: u8,
}

/// All 48 week buckets of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionFrequencies {
    pub region_code: String,
    pub weeks: Vec<WeekFrequencies>,
}

impl RegionFrequencies {
    pub fn empty(region_code: impl Into<String>, rarity_window: u8) -> Self {
        Self {
            region_code: region_code.into(),
            weeks: (0..WEEKS_PER_YEAR)
                .map(|_| WeekFrequencies {
                    rarity_window,
                    ..Default::default()
                })
                .collect(),
        }
    }

    pub fn week(&self, week: usize) -> Option<&WeekFrequencies> {
        self.weeks.get(week)
    }

    pub fn checklist_counts(&self) -> [u32; WEEKS_PER_YEAR] {
        let mut counts = [0; WEEKS_PER_YEAR];
        for (slot, week) in counts.iter_mut().zip(&self.weeks) {
            *slot = week.checklists;
        }
        counts
    }

    pub fn total_checklists(&self) -> u64 {
        self.weeks.iter().map(|w| u64::from(w.checklists)).sum()
    }

    /// No complete checklist in any week
    pub fn has_no_checklists(&self) -> bool {
        self.total_checklists() == 0
    }

    /// No checklists and no species entries in any week
    pub fn is_empty(&self) -> bool {
        self.has_no_checklists() && self.weeks.iter().all(|w| w.species.is_empty())
    }

    /// Week entries with names resolved, highest frequency first.
    /// Entries whose id is unknown to the index are skipped.
    pub fn named_week(&self, week: usize, names: &NameIndex) -> Vec<NamedFrequency> {
        let Some(week) = self.weeks.get(week) else {
            return Vec::new();
        };

        let mut named: Vec<NamedFrequency> = week
            .species
            .iter()
            .filter_map(|entry| {
                names.name_of(entry.species_id).map(|name| NamedFrequency {
                    name: name.to_string(),
                    frequency: entry.frequency,
                    is_rarity: entry.is_rarity,
                    years_observed: entry.years_observed,
                })
            })
            .collect();

        named.sort_by(|a, b| {
            b.frequency
                .total_cmp(&a.frequency)
                .then_with(|| a.name.cmp(&b.name))
        });
        named
    }
}
