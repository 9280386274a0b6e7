//! Ingestion scheduler.
//!
//! The calling thread memory-maps the source and acts purely as a producer:
//! it splits the map into lines and queues each one as a job. A fixed pool
//! of scoped worker threads parses and aggregates the jobs. Jobs borrow
//! their bytes straight from the map, so nothing is copied per line.

use super::subset::RegionSubset;
use super::work_queue::WorkQueue;
use crate::aggregator::{FinalizedIndex, FrequencyAggregator, SpeciesFilter, TaxonomicFilter};
use crate::config::IndexConfig;
use crate::constants::PROGRESS_LOG_INTERVAL;
use crate::ebd_parser::record_parser::parse_observation_bytes;
use crate::ebd_parser::stats::ParseCounters;
use crate::ebd_parser::{ColumnMapping, ParseStats};
use crate::error::{IndexError, Result};

use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lines between progress bar updates
const PROGRESS_BAR_STRIDE: usize = 4096;

/// Counters for one ingestion pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub parse: ParseStats,
    pub bytes_read: u64,
    pub regions: usize,
    pub species: usize,
    pub reference_year: Option<i32>,
    /// Data lines copied to the region subset, if one was configured
    pub subset_lines: Option<usize>,
    pub backpressure_waits: usize,
    pub elapsed: Duration,
}

/// Finalized aggregation state plus what it took to build it
#[derive(Debug)]
pub struct Ingested {
    pub index: FinalizedIndex,
    pub stats: IngestStats,
}

/// One source line, borrowed from the memory map
#[derive(Debug, Clone, Copy)]
struct Job<'a> {
    line_number: usize,
    /// Line as it appears in the source, minus the `\n`
    raw: &'a [u8],
    /// `raw` without a trailing `\r`
    line: &'a [u8],
}

/// Everything a worker needs to handle a job
#[derive(Clone, Copy)]
struct LineContext<'a> {
    mapping: &'a ColumnMapping,
    aggregator: &'a FrequencyAggregator,
    counters: &'a ParseCounters,
    subset: Option<&'a RegionSubset>,
}

impl LineContext<'_> {
    fn process(&self, job: Job<'_>) {
        let observation = match parse_observation_bytes(job.line, self.mapping) {
            Ok(observation) => observation,
            Err(source) => {
                let error = IndexError::Line {
                    line_number: job.line_number,
                    source,
                };
                debug!("{}", error);
                self.counters.record_skipped(|| error.to_string());
                return;
            }
        };
        self.counters.record_parsed();

        if let Some(subset) = self.subset {
            if subset.matches(&observation.region_code) {
                subset.append(job.raw);
            }
        }

        match self.aggregator.apply(&observation) {
            Ok(outcome) if outcome.is_aggregated() => {}
            Ok(_) => self.counters.record_filtered(),
            Err(e) => {
                warn!("Line {}: {}", job.line_number, e);
                self.counters.record_filtered();
            }
        }
    }
}

/// Runs one ingestion pass over a source file
#[derive(Debug, Clone)]
pub struct IngestionScheduler {
    config: IndexConfig,
}

impl IngestionScheduler {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Ingest with the default taxonomic species filter
    pub fn ingest(&self, source: &Path) -> Result<Ingested> {
        self.ingest_with_filter(source, Box::new(TaxonomicFilter::default()))
    }

    /// Read, parse and aggregate every line of `source`, blocking until all
    /// jobs finish, then run rarity finalization.
    pub fn ingest_with_filter(
        &self,
        source: &Path,
        species_filter: Box<dyn SpeciesFilter>,
    ) -> Result<Ingested> {
        let start = Instant::now();

        if !source.is_file() {
            return Err(IndexError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }
        let file = File::open(source)?;
        if file.metadata()?.len() == 0 {
            return Err(IndexError::invalid_header("source file is empty"));
        }
        // SAFETY: the map is read-only and the source is not modified while
        // ingestion runs.
        let mmap = unsafe { Mmap::map(&file)? };
        let data: &[u8] = &mmap;

        let mut lines = data.split(|&b| b == b'\n');
        let raw_header = lines.next().unwrap_or_default();
        let header = trim_cr(raw_header);
        let header_text = std::str::from_utf8(header)
            .map_err(|_| IndexError::invalid_header("header is not valid UTF-8"))?;
        let mapping = ColumnMapping::analyze(header_text)?;
        info!(
            "Mapped {} of {} columns in {}",
            mapping.mapped_count(),
            mapping.column_count(),
            source.display()
        );

        let subset = match &self.config.region_subset {
            Some(subset) => Some(RegionSubset::create(
                subset.region_prefix.clone(),
                &subset.output_path,
                raw_header,
            )?),
            None => None,
        };

        let aggregator =
            FrequencyAggregator::new(self.config.mode.clone(), self.config.rarity, species_filter);
        let counters = ParseCounters::new();
        let queue: WorkQueue<Job<'_>> =
            WorkQueue::new(self.config.high_water_mark, self.config.low_water_mark);
        let progress = self.progress_bar(data.len() as u64);

        info!(
            "Ingesting {} bytes with {} workers ({})",
            data.len(),
            self.config.workers,
            self.config.mode
        );

        let context = LineContext {
            mapping: &mapping,
            aggregator: &aggregator,
            counters: &counters,
            subset: subset.as_ref(),
        };

        let bytes_read = thread::scope(|scope| -> Result<u64> {
            let queue = &queue;
            for worker in 0..self.config.workers.max(1) {
                let spawned = thread::Builder::new()
                    .name(format!("ingest-{}", worker))
                    .spawn_scoped(scope, move || {
                        while let Some(job) = queue.pop() {
                            context.process(job);
                        }
                    });
                if let Err(e) = spawned {
                    queue.close();
                    return Err(IndexError::Worker {
                        reason: format!("could not start ingest worker {}: {}", worker, e),
                    });
                }
            }

            let mut bytes_read = raw_header.len() as u64 + 1;
            for (index, line) in lines.enumerate() {
                bytes_read += line.len() as u64 + 1;
                let raw = line;
                let line = trim_cr(raw);
                if line.is_empty() {
                    continue;
                }

                let data_lines = counters.record_line();
                queue.push(Job {
                    // Header is line 1
                    line_number: index + 2,
                    raw,
                    line,
                });

                if data_lines % PROGRESS_BAR_STRIDE == 0 {
                    progress.set_position(bytes_read.min(data.len() as u64));
                }
                if data_lines % PROGRESS_LOG_INTERVAL == 0 {
                    info!("Read {} lines", data_lines);
                }
            }

            queue.close();
            Ok(bytes_read.min(data.len() as u64))
        })?;

        progress.finish_and_clear();

        let parse = counters.snapshot();
        info!(
            "Parsed {} of {} lines ({} skipped, {} filtered)",
            parse.observations_parsed,
            parse.total_lines,
            parse.lines_skipped,
            parse.observations_filtered
        );

        let subset_lines = subset.map(RegionSubset::finish).transpose()?;
        let backpressure_waits = queue.backpressure_waits();
        if backpressure_waits > 0 {
            debug!("Reader paused {} times for workers", backpressure_waits);
        }

        let index = aggregator.finish();
        let stats = IngestStats {
            parse,
            bytes_read,
            regions: index.regions.len(),
            species: index.names.len(),
            reference_year: index.reference_year,
            subset_lines,
            backpressure_waits,
            elapsed: start.elapsed(),
        };

        Ok(Ingested { index, stats })
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message("Ingesting observations");
        bar
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
