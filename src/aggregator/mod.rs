//! Concurrent region/week/species aggregation
//!
//! The [`FrequencyAggregator`] is the shared state of one ingestion session.
//! Workers call [`FrequencyAggregator::apply`] once per parsed observation;
//! the region map and the species [`NameIndex`] sit behind a single mutex,
//! while the session's [`ReferenceYear`] has its own lock.
//!
//! After the worker pool drains, [`FrequencyAggregator::finish`] runs the
//! single-threaded rarity finalization and hands back a [`FinalizedIndex`].
//!
//! ## Modules
//!
//! - [`name_index`] - species name <-> id map
//! - [`table`] - per-region week buckets and species stats
//! - [`species_filter`] - species inclusion predicates
//! - [`mode`] - per-session aggregation mode

pub mod mode;
pub mod name_index;
pub mod species_filter;
pub mod table;

#[cfg(test)]
pub mod tests;

pub use mode::AggregationMode;
pub use name_index::NameIndex;
pub use species_filter::{IncludeAll, SpeciesFilter, TaxonomicFilter};
pub use table::{RegionFrequencyTable, SpeciesStats, WeekBucket};

use crate::Result;
use crate::frequencies::RegionFrequencies;
use crate::models::Observation;
use crate::rarity::{RarityPolicy, ReferenceYear};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// What happened to one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOutcome {
    Aggregated,
    Unapproved,
    ExcludedSpecies,
    OutsideMode,
}

impl AggregateOutcome {
    pub fn is_aggregated(self) -> bool {
        self == AggregateOutcome::Aggregated
    }
}

/// State guarded by the aggregation lock
#[derive(Debug, Default)]
pub struct AggregationState {
    pub regions: HashMap<String, RegionFrequencyTable>,
    pub names: NameIndex,
}

/// Shared accumulator for one ingestion session
#[derive(Debug)]
pub struct FrequencyAggregator {
    state: Mutex<AggregationState>,
    reference_year: ReferenceYear,
    policy: RarityPolicy,
    mode: AggregationMode,
    species_filter: Box<dyn SpeciesFilter>,
}

impl FrequencyAggregator {
    pub fn new(
        mode: AggregationMode,
        policy: RarityPolicy,
        species_filter: Box<dyn SpeciesFilter>,
    ) -> Self {
        Self {
            state: Mutex::new(AggregationState::default()),
            reference_year: ReferenceYear::new(),
            policy,
            mode,
            species_filter,
        }
    }

    pub fn mode(&self) -> &AggregationMode {
        &self.mode
    }

    pub fn policy(&self) -> &RarityPolicy {
        &self.policy
    }

    /// Apply one observation. Fails only when the name index is full.
    pub fn apply(&self, observation: &Observation) -> Result<AggregateOutcome> {
        if !observation.approved {
            return Ok(AggregateOutcome::Unapproved);
        }
        if !self.species_filter.includes(&observation.common_name) {
            return Ok(AggregateOutcome::ExcludedSpecies);
        }
        if !self.mode.admits(observation) {
            return Ok(AggregateOutcome::OutsideMode);
        }

        self.reference_year
            .observe(observation.year(), observation.is_year_end());

        let complete = observation
            .complete_checklist
            .then_some(observation.checklist_id.as_str());

        let mut state = self.lock_state();
        let species_id = state.names.get_or_insert(&observation.common_name)?;
        state
            .regions
            .entry(observation.region_code.clone())
            .or_insert_with(|| RegionFrequencyTable::new(observation.region_code.clone()))
            .record(
                observation.week(),
                species_id,
                observation.year(),
                complete,
                &self.policy,
            );

        Ok(AggregateOutcome::Aggregated)
    }

    /// Number of regions accumulated so far
    pub fn region_count(&self) -> usize {
        self.lock_state().regions.len()
    }

    /// Run rarity finalization and release the accumulated state
    pub fn finish(self) -> FinalizedIndex {
        let reference_year = self.reference_year.resolve();
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut regions: BTreeMap<String, RegionFrequencyTable> =
            state.regions.into_iter().collect();

        match reference_year {
            Some(year) => {
                info!(
                    "Finalizing rarity for {} regions against reference year {}",
                    regions.len(),
                    year
                );
                for table in regions.values_mut() {
                    table.finalize(year, &self.policy);
                }
            }
            None if regions.is_empty() => debug!("Nothing aggregated, skipping rarity finalization"),
            None => warn!("No reference year could be resolved, rarity flags left unset"),
        }

        FinalizedIndex {
            regions,
            names: state.names,
            reference_year,
            policy: self.policy,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AggregationState> {
        // A worker that panicked mid-update leaves at most one observation
        // half-applied; keep going rather than poisoning the whole run.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Aggregated tables after rarity finalization
#[derive(Debug)]
pub struct FinalizedIndex {
    pub regions: BTreeMap<String, RegionFrequencyTable>,
    pub names: NameIndex,
    pub reference_year: Option<i32>,
    pub policy: RarityPolicy,
}

impl FinalizedIndex {
    pub fn region(&self, region_code: &str) -> Option<&RegionFrequencyTable> {
        self.regions.get(region_code)
    }

    /// Percentage tables for every region, ordered by region code
    pub fn frequencies(&self) -> Vec<RegionFrequencies> {
        self.regions
            .values()
            .map(|table| table.to_frequencies(&self.policy))
            .collect()
    }
}
