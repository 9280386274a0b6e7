//! Command-line argument definitions for the frequency index builder
//!
//! This module defines the complete CLI interface using clap derive API.
//! Build flags map onto an [`IndexConfig`]; anything not given keeps the
//! configuration default.

use crate::aggregator::AggregationMode;
use crate::config::{IndexConfig, default_output_dir};
use crate::error::{IndexError, Result};
use crate::models::Coordinates;
use crate::rarity::RarityPolicy;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the eBird frequency index builder
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ebd-frequency",
    version,
    about = "Compile eBird Basic Dataset observations into per-region weekly frequency indexes",
    long_about = "Reads a tab-delimited eBird Basic Dataset export in a single pass and writes, \
                  for every region, the share of complete checklists reporting each species in \
                  each of 48 weeks of the year, with multi-year rarity flags."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Build a frequency index from a dataset export
    Build(BuildArgs),
    /// Print one region of a built index
    Show(ShowArgs),
}

/// Arguments for the build command
#[derive(Debug, Clone, Parser)]
pub struct BuildArgs {
    /// Tab-delimited observation dataset
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for region files
    ///
    /// Defaults to the user data directory, e.g. ~/.local/share/ebd-frequency
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Ingestion worker threads (default: 2 per CPU)
    #[arg(short = 'w', long = "workers")]
    pub workers: Option<usize>,

    /// Pending lines at which reading pauses
    #[arg(long = "high-water-mark", value_name = "LINES")]
    pub high_water_mark: Option<usize>,

    /// Pending lines below which reading resumes
    #[arg(long = "low-water-mark", value_name = "LINES")]
    pub low_water_mark: Option<usize>,

    /// Rarity window length in years
    #[arg(long = "years-to-check", value_name = "YEARS")]
    pub years_to_check: Option<u8>,

    /// Seen in at most this many window years counts as rare
    #[arg(long = "min-hit-years", value_name = "YEARS")]
    pub min_hit_years: Option<u8>,

    /// Copy raw lines whose region code starts with this prefix
    #[arg(long = "region-filter", value_name = "PREFIX", requires = "subset_out")]
    pub region_filter: Option<String>,

    /// Destination of the region subset extract
    #[arg(long = "subset-out", value_name = "FILE", requires = "region_filter")]
    pub subset_out: Option<PathBuf>,

    /// Countries folded into a single country-level table (comma-separated)
    #[arg(long = "consolidate", value_name = "CC,..", value_delimiter = ',')]
    pub consolidate: Vec<String>,

    /// Trip planning: month of the trip (1-12)
    #[arg(long = "month", requires_all = ["lat", "lon", "radius_km"], conflicts_with_all = ["start", "end"])]
    pub month: Option<u32>,

    /// Trip planning: latitude of the trip center
    #[arg(long = "lat", requires = "month", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Trip planning: longitude of the trip center
    #[arg(long = "lon", requires = "month", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Trip planning: radius around the center in kilometres
    #[arg(long = "radius-km", requires = "month")]
    pub radius_km: Option<f64>,

    /// Date range: first day included (YYYY-MM-DD)
    #[arg(long = "start", requires = "end")]
    pub start: Option<NaiveDate>,

    /// Date range: last day included (YYYY-MM-DD)
    #[arg(long = "end", requires = "start")]
    pub end: Option<NaiveDate>,

    /// Region files written concurrently
    #[arg(long = "write-concurrency")]
    pub write_concurrency: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides progress bars.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the build summary"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for the build summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Arguments for the show command
#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// Region code, e.g. US-CA or US-CA-001
    #[arg(value_name = "REGION")]
    pub region: String,

    /// Index directory written by `build`
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Week to list species for (0-47); without it, checklist counts are shown
    #[arg(long = "week")]
    pub week: Option<usize>,

    /// Logging verbosity level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl BuildArgs {
    /// Map the flags onto a configuration
    pub fn to_config(&self) -> Result<IndexConfig> {
        let mut config = IndexConfig::default()
            .with_mode(self.mode())
            .with_consolidated_countries(&self.consolidate)
            .with_progress(self.show_progress());

        if let Some(output) = &self.output {
            config = config.with_output_dir(output);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.high_water_mark.is_some() || self.low_water_mark.is_some() {
            let high = self.high_water_mark.unwrap_or(config.high_water_mark);
            let low = self.low_water_mark.unwrap_or(config.low_water_mark);
            config = config.with_water_marks(high, low);
        }
        if self.years_to_check.is_some() || self.min_hit_years.is_some() {
            let defaults = RarityPolicy::default();
            config = config.with_rarity(RarityPolicy {
                years_to_check: self.years_to_check.unwrap_or(defaults.years_to_check),
                min_hit_years: self.min_hit_years.unwrap_or(defaults.min_hit_years),
            });
        }
        if let (Some(prefix), Some(path)) = (&self.region_filter, &self.subset_out) {
            config = config.with_region_subset(prefix.to_uppercase(), path);
        }
        if let Some(write_concurrency) = self.write_concurrency {
            config = config.with_write_concurrency(write_concurrency);
        }

        config.validate()?;
        Ok(config)
    }

    /// Aggregation mode selected by the trip or date range flags
    pub fn mode(&self) -> AggregationMode {
        if let (Some(month), Some(lat), Some(lon), Some(radius_km)) =
            (self.month, self.lat, self.lon, self.radius_km)
        {
            return AggregationMode::TripPlanning {
                month,
                center: Coordinates::new(lat, lon),
                radius_km,
            };
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => AggregationMode::DateRange { start, end },
            _ => AggregationMode::Frequency,
        }
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level(self.verbose)
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ShowArgs {
    pub fn index_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(default_output_dir)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(week) = self.week {
            if week >= crate::constants::WEEKS_PER_YEAR {
                return Err(IndexError::configuration(format!(
                    "week must be 0-47, got {}",
                    week
                )));
            }
        }
        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
