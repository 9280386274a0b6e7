//! Multi-year rarity classification.
//!
//! Every (region, week, species) entry keeps the most recent distinct years
//! it was seen in. Once ingestion finishes, the entry is classified against
//! a window ending at the session's reference year: species seen in only a
//! few of the window's years are flagged as rarities.

use crate::constants::{MIN_HIT_YEARS, YEARS_TO_CHECK};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::debug;

/// Thresholds for the rarity decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityPolicy {
    /// Window length in years, also the tracker capacity
    pub years_to_check: u8,
    /// Seen in at most this many window years means rare
    pub min_hit_years: u8,
}

impl Default for RarityPolicy {
    fn default() -> Self {
        Self {
            years_to_check: YEARS_TO_CHECK,
            min_hit_years: MIN_HIT_YEARS,
        }
    }
}

impl RarityPolicy {
    /// Inclusive year window ending at `reference_year`
    pub fn window(&self, reference_year: i32) -> std::ops::RangeInclusive<i32> {
        (reference_year - i32::from(self.years_to_check) + 1)..=reference_year
    }
}

/// Fixed-capacity set holding the most recent distinct years seen.
///
/// Inserting a year already present is a no-op. When full, a new year
/// replaces the smallest stored year only if it is larger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecentYears {
    years: Vec<i32>,
}

impl RecentYears {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, year: i32, capacity: usize) {
        if capacity == 0 || self.years.contains(&year) {
            return;
        }
        if self.years.len() < capacity {
            self.years.push(year);
            return;
        }
        if let Some((slot, &oldest)) = self.years.iter().enumerate().min_by_key(|(_, y)| **y) {
            if year > oldest {
                self.years[slot] = year;
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Stored years, ascending
    pub fn sorted(&self) -> Vec<i32> {
        let mut years = self.years.clone();
        years.sort_unstable();
        years
    }

    pub fn count_in(&self, window: &std::ops::RangeInclusive<i32>) -> usize {
        self.years.iter().filter(|y| window.contains(y)).count()
    }
}

/// Per-entry year tracker and finalized rarity verdict
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RarityTracker {
    years: RecentYears,
    is_rarity: bool,
    years_observed_in_window: u8,
}

impl RarityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_year(&mut self, year: i32, policy: &RarityPolicy) {
        self.years.insert(year, usize::from(policy.years_to_check));
    }

    /// Apply the decision rule against a resolved reference year
    pub fn finalize(&mut self, reference_year: i32, policy: &RarityPolicy) {
        let hits = self.years.count_in(&policy.window(reference_year));
        // Bounded by the tracker capacity, which is a u8
        let hits = u8::try_from(hits).unwrap_or(u8::MAX);
        if hits <= policy.min_hit_years {
            self.is_rarity = true;
            self.years_observed_in_window = hits;
        } else {
            self.is_rarity = false;
            self.years_observed_in_window = 0;
        }
    }

    /// Only meaningful after [`finalize`](Self::finalize)
    pub fn is_rarity(&self) -> bool {
        self.is_rarity
    }

    /// Only meaningful after [`finalize`](Self::finalize) on a rarity
    pub fn years_observed_in_window(&self) -> u8 {
        self.years_observed_in_window
    }
}

/// Session-scoped "today" for multi-year datasets.
///
/// Advanced only by Dec 31 sightings; guarded by its own lock so it never
/// contends with the aggregation map. The maximum year seen is tracked
/// separately as the fallback for datasets with no year-end records.
#[derive(Debug)]
pub struct ReferenceYear {
    advanced: Mutex<Option<i32>>,
    max_seen: AtomicI32,
}

impl Default for ReferenceYear {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceYear {
    pub fn new() -> Self {
        Self {
            advanced: Mutex::new(None),
            max_seen: AtomicI32::new(i32::MIN),
        }
    }

    /// Note an observation year; `year_end` marks a Dec 31 sighting
    pub fn observe(&self, year: i32, year_end: bool) {
        self.max_seen.fetch_max(year, Ordering::Relaxed);
        if year_end {
            let mut advanced = self
                .advanced
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if advanced.is_none_or(|current| year > current) {
                *advanced = Some(year);
            }
        }
    }

    /// Reference year from Dec 31 sightings, or `max year seen - 1`.
    /// `None` if no observation was ever recorded.
    pub fn resolve(&self) -> Option<i32> {
        let advanced = *self
            .advanced
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if advanced.is_some() {
            return advanced;
        }

        let max_seen = self.max_seen.load(Ordering::Relaxed);
        if max_seen == i32::MIN {
            None
        } else {
            debug!(
                "No Dec 31 records, falling back to reference year {}",
                max_seen - 1
            );
            Some(max_seen - 1)
        }
    }
}
