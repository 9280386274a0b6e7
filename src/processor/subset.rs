//! Region subset extract.
//!
//! While the index is built, raw source lines whose region code starts with
//! a prefix are copied verbatim to a side file, header first. Workers share
//! the file through its own mutex, independent of the aggregation lock.

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct RegionSubset {
    prefix: String,
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    lines_written: AtomicUsize,
    write_errors: AtomicUsize,
}

impl RegionSubset {
    /// Create the side file and write the source header to it, exactly as
    /// read (a trailing `\r` is kept)
    pub fn create(prefix: impl Into<String>, path: &Path, header: &[u8]) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(header)?;
        writer.write_all(b"\n")?;

        Ok(Self {
            prefix: prefix.into(),
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
            lines_written: AtomicUsize::new(0),
            write_errors: AtomicUsize::new(0),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, region_code: &str) -> bool {
        region_code.starts_with(&self.prefix)
    }

    /// Append one raw line, `\r` included if the source has one. A failed
    /// write is logged and counted, never fatal.
    pub fn append(&self, line: &[u8]) {
        let mut writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());
        let result = writer
            .write_all(line)
            .and_then(|_| writer.write_all(b"\n"));
        drop(writer);

        match result {
            Ok(()) => {
                self.lines_written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                if self.write_errors.fetch_add(1, Ordering::Relaxed) == 0 {
                    warn!("Failed to append to subset {}: {}", self.path.display(), e);
                }
            }
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written.load(Ordering::Relaxed)
    }

    /// Flush and close; returns the number of data lines written
    pub fn finish(self) -> Result<usize> {
        let mut writer = self
            .writer
            .into_inner()
            .unwrap_or_else(|p| p.into_inner());
        writer.flush()?;

        let lines = self.lines_written.load(Ordering::Relaxed);
        let errors = self.write_errors.load(Ordering::Relaxed);
        if errors > 0 {
            warn!("{} subset lines could not be written", errors);
        }
        debug!("Wrote {} lines to subset {}", lines, self.path.display());
        Ok(lines)
    }
}
