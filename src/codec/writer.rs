//! Region file writer.
//!
//! Writes the species name index and one binary file per region under
//! `<out>/<COUNTRY>/<REGION>.bin`. Files are encoded and written on the tokio
//! blocking pool with bounded concurrency. A failed region is recorded in the
//! [`WriteSummary`] and does not stop the others.

use super::format::encode_region;
use super::name_index_file::save_name_index;
use crate::aggregator::NameIndex;
use crate::constants::{
    FREQUENCY_FILE_EXTENSION, NAME_INDEX_FILENAME, country_of, is_subregion_of, region_depth,
};
use crate::error::{IndexError, Result};
use crate::frequencies::RegionFrequencies;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, error, info};

/// Outcome of writing a set of regions
#[derive(Debug, Default)]
pub struct WriteSummary {
    pub regions_written: usize,
    pub bytes_written: u64,
    /// Parent regions skipped because their children carry all the data
    pub pruned: Vec<String>,
    pub failures: Vec<IndexError>,
}

impl WriteSummary {
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Path of a region's frequency file under `root`
pub fn region_path(root: &Path, region_code: &str) -> PathBuf {
    root.join(country_of(region_code))
        .join(format!("{}.{}", region_code, FREQUENCY_FILE_EXTENSION))
}

/// Parent regions with no data of their own whose children are written.
///
/// A parent only holds rows that carry no finer code, so it is dropped only
/// when it has neither checklists nor species entries in any week.
///
/// Regions are visited deepest first so a pruned child never counts as a
/// written child of its own parent.
pub fn pruned_regions(regions: &[RegionFrequencies]) -> BTreeSet<String> {
    let mut by_depth: Vec<&RegionFrequencies> = regions.iter().collect();
    by_depth.sort_by_key(|region| Reverse(region_depth(&region.region_code)));

    let mut written: Vec<&str> = Vec::with_capacity(regions.len());
    let mut pruned = BTreeSet::new();

    for region in by_depth {
        let code = region.region_code.as_str();
        let has_written_child = written.iter().any(|child| is_subregion_of(child, code));
        if region.is_empty() && has_written_child {
            pruned.insert(code.to_string());
        } else {
            written.push(code);
        }
    }

    pruned
}

/// Writer for one output tree
#[derive(Debug, Clone)]
pub struct FrequencyWriter {
    output_dir: PathBuf,
    concurrency: usize,
    show_progress: bool,
}

impl FrequencyWriter {
    pub fn new(output_dir: impl Into<PathBuf>, concurrency: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            concurrency: concurrency.max(1),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the name index, then every region that is not pruned.
    ///
    /// Fails early only if the output directory or the name index cannot be
    /// written; per-region failures land in [`WriteSummary::failures`].
    pub async fn write_all(
        &self,
        regions: Vec<RegionFrequencies>,
        names: &NameIndex,
    ) -> Result<WriteSummary> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let names_path = self.output_dir.join(NAME_INDEX_FILENAME);
        let names = names.clone();
        task::spawn_blocking(move || save_name_index(&names_path, &names))
            .await
            .map_err(|e| IndexError::Worker {
                reason: format!("name index write task failed: {}", e),
            })??;

        let pruned = pruned_regions(&regions);
        let to_write: Vec<RegionFrequencies> = regions
            .into_iter()
            .filter(|region| !pruned.contains(&region.region_code))
            .collect();

        info!(
            "Writing {} regions to {} ({} pruned)",
            to_write.len(),
            self.output_dir.display(),
            pruned.len()
        );

        let progress = self.progress_bar(to_write.len() as u64);

        let results = stream::iter(to_write)
            .map(|region| {
                let path = region_path(&self.output_dir, &region.region_code);
                let progress = progress.clone();
                async move {
                    let region_code = region.region_code.clone();
                    let task_path = path.clone();
                    let result =
                        task::spawn_blocking(move || write_region_file(&task_path, &region)).await;
                    progress.inc(1);

                    match result {
                        Ok(Ok(bytes)) => {
                            debug!("Wrote {} ({} bytes)", path.display(), bytes);
                            Ok(bytes)
                        }
                        Ok(Err(e)) => Err(IndexError::region_write(region_code, path, e)),
                        Err(e) => Err(IndexError::Worker {
                            reason: format!("write task for {} failed: {}", region_code, e),
                        }),
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        progress.finish_and_clear();

        let mut summary = WriteSummary {
            pruned: pruned.into_iter().collect(),
            ..Default::default()
        };
        for result in results {
            match result {
                Ok(bytes) => {
                    summary.regions_written += 1;
                    summary.bytes_written += bytes;
                }
                Err(e) => {
                    error!("{}", e);
                    summary.failures.push(e);
                }
            }
        }

        info!(
            "Wrote {} region files ({} bytes), {} failed",
            summary.regions_written,
            summary.bytes_written,
            summary.failures.len()
        );
        Ok(summary)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message("Writing regions");
        bar
    }
}

fn write_region_file(path: &Path, region: &RegionFrequencies) -> std::io::Result<u64> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = encode_region(region)?;
    std::fs::write(path, &bytes)?;
    Ok(bytes.len() as u64)
}
