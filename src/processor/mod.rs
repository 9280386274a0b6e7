//! Index build pipeline.
//!
//! Orchestrates one complete build using the specialized modules:
//! ingestion on a blocking thread, conversion to percentage tables,
//! country consolidation and the concurrent region file write. No region
//! file is written until ingestion and rarity finalization are done.
//!
//! ## Modules
//!
//! - [`scheduler`] - memory-mapped reader feeding the worker pool
//! - [`work_queue`] - FIFO with water-mark backpressure
//! - [`subset`] - raw-line extract of one region prefix

pub mod scheduler;
pub mod subset;
pub mod work_queue;

#[cfg(test)]
pub mod tests;

pub use scheduler::{IngestStats, Ingested, IngestionScheduler};
pub use subset::RegionSubset;
pub use work_queue::WorkQueue;

use crate::aggregator::{SpeciesFilter, TaxonomicFilter};
use crate::codec::{FrequencyWriter, WriteSummary};
use crate::config::IndexConfig;
use crate::consolidation::consolidate_countries;
use crate::error::{IndexError, Result};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::info;

/// Result of a complete build
#[derive(Debug)]
pub struct BuildReport {
    pub ingest: IngestStats,
    pub write: WriteSummary,
    pub output_dir: PathBuf,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.write.success()
    }
}

/// Builds a frequency index from one source file
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    source: PathBuf,
    config: IndexConfig,
}

impl IndexBuilder {
    /// Create a builder, validating the configuration and the source path
    pub fn new(source: impl Into<PathBuf>, config: IndexConfig) -> Result<Self> {
        let source = source.into();
        config.validate()?;
        if !source.exists() {
            return Err(IndexError::SourceNotFound { path: source });
        }
        Ok(Self { source, config })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Build with the default taxonomic species filter
    pub async fn build(&self) -> Result<BuildReport> {
        self.build_with_filter(Box::new(TaxonomicFilter::default()))
            .await
    }

    /// Main build entry point
    pub async fn build_with_filter(
        &self,
        species_filter: Box<dyn SpeciesFilter>,
    ) -> Result<BuildReport> {
        let start = Instant::now();

        let scheduler = IngestionScheduler::new(self.config.clone());
        let source = self.source.clone();
        let Ingested { index, stats } =
            task::spawn_blocking(move || scheduler.ingest_with_filter(&source, species_filter))
                .await
                .map_err(|e| IndexError::Worker {
                    reason: format!("ingestion task failed: {}", e),
                })??;

        let regions = consolidate_countries(index.frequencies(), &self.config.consolidated_countries);
        info!("Prepared {} region tables", regions.len());

        let writer = FrequencyWriter::new(&self.config.output_dir, self.config.write_concurrency)
            .with_progress(self.config.show_progress);
        let write = writer.write_all(regions, &index.names).await?;

        Ok(BuildReport {
            ingest: stats,
            write,
            output_dir: self.config.output_dir.clone(),
            elapsed: start.elapsed(),
        })
    }
}
