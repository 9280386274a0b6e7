//! Configuration management and validation.
//!
//! [`IndexConfig`] carries every knob of one index build: the ingestion
//! worker pool and its backpressure marks, rarity thresholds, the optional
//! region subset extract, country consolidation, the aggregation mode and
//! where and how region files are written.

use crate::aggregator::AggregationMode;
use crate::constants::{
    DEFAULT_HIGH_WATER_MARK, DEFAULT_LOW_WATER_MARK, DEFAULT_OUTPUT_DIR_NAME,
    DEFAULT_WRITE_CONCURRENCY, WORKERS_PER_CPU,
};
use crate::error::{IndexError, Result};
use crate::rarity::RarityPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Raw-line extract of one region prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSubsetConfig {
    /// Region code prefix, e.g. `US-CA`
    pub region_prefix: String,
    /// File receiving the header and every matching line verbatim
    pub output_path: PathBuf,
}

/// Settings for one index build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Ingestion worker threads
    pub workers: usize,

    /// Pending line count at which the reader stops queueing
    pub high_water_mark: usize,

    /// Pending line count below which the reader resumes
    pub low_water_mark: usize,

    /// Rarity window and hit threshold
    pub rarity: RarityPolicy,

    /// Optional raw-line extract
    pub region_subset: Option<RegionSubsetConfig>,

    /// Countries folded into a single country-level table
    pub consolidated_countries: Vec<String>,

    /// Which observations the session aggregates
    pub mode: AggregationMode,

    /// Root of the output tree
    pub output_dir: PathBuf,

    /// Region files written at once
    pub write_concurrency: usize,

    /// Draw progress bars
    pub show_progress: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get() * WORKERS_PER_CPU,
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            low_water_mark: DEFAULT_LOW_WATER_MARK,
            rarity: RarityPolicy::default(),
            region_subset: None,
            consolidated_countries: Vec::new(),
            mode: AggregationMode::default(),
            output_dir: default_output_dir(),
            write_concurrency: DEFAULT_WRITE_CONCURRENCY,
            show_progress: true,
        }
    }
}

/// `<data dir>/ebd-frequency`, or `./ebd-frequency` if there is no data dir
pub fn default_output_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_OUTPUT_DIR_NAME)
}

impl IndexConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_water_marks(mut self, high: usize, low: usize) -> Self {
        self.high_water_mark = high;
        self.low_water_mark = low;
        self
    }

    pub fn with_rarity(mut self, rarity: RarityPolicy) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_region_subset(
        mut self,
        region_prefix: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        self.region_subset = Some(RegionSubsetConfig {
            region_prefix: region_prefix.into(),
            output_path: output_path.into(),
        });
        self
    }

    /// Country codes are stored upper-cased
    pub fn with_consolidated_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.consolidated_countries = countries
            .into_iter()
            .map(|c| c.as_ref().trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    pub fn with_mode(mut self, mode: AggregationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_write_concurrency(mut self, write_concurrency: usize) -> Self {
        self.write_concurrency = write_concurrency;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check the configuration is internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(IndexError::configuration("workers must be at least 1"));
        }
        if self.low_water_mark == 0 {
            return Err(IndexError::configuration("low water mark must be at least 1"));
        }
        if self.low_water_mark >= self.high_water_mark {
            return Err(IndexError::configuration(format!(
                "low water mark ({}) must be below high water mark ({})",
                self.low_water_mark, self.high_water_mark
            )));
        }
        if self.rarity.years_to_check == 0 {
            return Err(IndexError::configuration("years to check must be at least 1"));
        }
        if self.rarity.min_hit_years > self.rarity.years_to_check {
            return Err(IndexError::configuration(format!(
                "min hit years ({}) cannot exceed years to check ({})",
                self.rarity.min_hit_years, self.rarity.years_to_check
            )));
        }
        if let Some(subset) = &self.region_subset {
            if subset.region_prefix.is_empty() {
                return Err(IndexError::configuration("region subset prefix is empty"));
            }
        }
        if self.write_concurrency == 0 {
            return Err(IndexError::configuration(
                "write concurrency must be at least 1",
            ));
        }
        self.mode.validate()?;

        debug!(
            "Configuration valid: {} workers, water marks {}/{}, mode {}",
            self.workers, self.high_water_mark, self.low_water_mark, self.mode
        );
        Ok(())
    }
}
