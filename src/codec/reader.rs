//! Region file reader.
//!
//! The name index side file is loaded at most once per reader, on first use,
//! and shared behind an `Arc`. Region files are read whole and decoded
//! eagerly; a region file is a few kilobytes.
//!
//! Weekly checklist counts read back are capped at 65,535 while frequencies
//! are not; use [`WeekFrequencies::is_saturated`] before turning a frequency
//! back into an absolute count.
//!
//! [`WeekFrequencies::is_saturated`]: crate::frequencies::WeekFrequencies::is_saturated

use super::format::decode_region;
use super::name_index_file::load_name_index;
use super::writer::region_path;
use crate::aggregator::NameIndex;
use crate::constants::{FREQUENCY_FILE_EXTENSION, NAME_INDEX_FILENAME, WEEKS_PER_YEAR};
use crate::error::{IndexError, Result};
use crate::frequencies::{NamedFrequency, RegionFrequencies};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Read access to one output tree
#[derive(Debug)]
pub struct FrequencyReader {
    root: PathBuf,
    names: Mutex<Option<Arc<NameIndex>>>,
    /// First rarity window length seen; later regions are checked against it
    rarity_window: Mutex<Option<u8>>,
}

impl FrequencyReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            names: Mutex::new(None),
            rarity_window: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn region_path(&self, region_code: &str) -> PathBuf {
        region_path(&self.root, region_code)
    }

    /// Decode one region's 48 weeks. The name index is loaded first, so a
    /// tree without its side file fails here rather than yielding bare ids.
    pub fn open_region(&self, region_code: &str) -> Result<RegionFrequencies> {
        let path = self.region_path(region_code);
        if !path.is_file() {
            return Err(IndexError::RegionNotFound {
                region: region_code.to_string(),
                path: self.root.clone(),
            });
        }
        self.names()?;

        let bytes = std::fs::read(&path)?;
        let region = decode_region(region_code, &bytes)?;
        debug!("Opened {} ({} bytes)", path.display(), bytes.len());

        self.check_rarity_window(&region);
        Ok(region)
    }

    /// The species name index, loading it on first call
    pub fn names(&self) -> Result<Arc<NameIndex>> {
        let mut slot = self.names.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(names) = slot.as_ref() {
            return Ok(Arc::clone(names));
        }

        let names = Arc::new(load_name_index(&self.root.join(NAME_INDEX_FILENAME))?);
        *slot = Some(Arc::clone(&names));
        Ok(names)
    }

    /// Named species entries for one week, highest frequency first
    pub fn week_species(&self, region_code: &str, week: usize) -> Result<Vec<NamedFrequency>> {
        if week >= WEEKS_PER_YEAR {
            return Err(IndexError::configuration(format!(
                "week {} out of range 0..{}",
                week, WEEKS_PER_YEAR
            )));
        }
        let region = self.open_region(region_code)?;
        let names = self.names()?;
        Ok(region.named_week(week, &names))
    }

    /// Complete-checklist count for each of the 48 weeks
    pub fn checklist_counts(&self, region_code: &str) -> Result<[u32; WEEKS_PER_YEAR]> {
        Ok(self.open_region(region_code)?.checklist_counts())
    }

    /// Every region code with a file under the root, sorted
    pub fn available_regions(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut regions = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(2).max_depth(2) {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(FREQUENCY_FILE_EXTENSION)
            {
                continue;
            }
            if let Some(code) = path.file_stem().and_then(|s| s.to_str()) {
                regions.push(code.to_string());
            }
        }

        regions.sort();
        Ok(regions)
    }

    fn check_rarity_window(&self, region: &RegionFrequencies) {
        let mut expected = self.rarity_window.lock().unwrap_or_else(|p| p.into_inner());
        for week in &region.weeks {
            match *expected {
                None => *expected = Some(week.rarity_window),
                Some(window) if window != week.rarity_window => {
                    warn!(
                        "Region {} uses a {}-year rarity window, expected {}",
                        region.region_code, week.rarity_window, window
                    );
                    return;
                }
                Some(_) => {}
            }
        }
    }
}
