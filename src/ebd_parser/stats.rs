//! Parsing statistics for observation ingestion
//!
//! Counters are updated from many worker threads, so the live form uses
//! atomics and is snapshotted into [`ParseStats`] once ingestion ends.

use crate::constants::MAX_RECORDED_ERRORS;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of parsing statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Data lines read from the source (header excluded)
    pub total_lines: usize,

    /// Lines that produced an observation
    pub observations_parsed: usize,

    /// Lines rejected by the parser
    pub lines_skipped: usize,

    /// Parsed observations excluded by approval, species, or mode filters
    pub observations_filtered: usize,

    /// First parse errors, for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            (self.observations_parsed as f64 / self.total_lines as f64) * 100.0
        }
    }

    /// Observations that reached the aggregator
    pub fn observations_aggregated(&self) -> usize {
        self.observations_parsed
            .saturating_sub(self.observations_filtered)
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}

/// Shared counters updated by ingestion workers
#[derive(Debug, Default)]
pub struct ParseCounters {
    total_lines: AtomicUsize,
    observations_parsed: AtomicUsize,
    lines_skipped: AtomicUsize,
    observations_filtered: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl ParseCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&self) -> usize {
        self.total_lines.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_parsed(&self) {
        self.observations_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.observations_filtered.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a rejected line, keeping the message if there is room
    pub fn record_skipped(&self, message: impl FnOnce() -> String) {
        self.lines_skipped.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut errors) = self.errors.lock() {
            if errors.len() < MAX_RECORDED_ERRORS {
                errors.push(message());
            }
        }
    }

    pub fn snapshot(&self) -> ParseStats {
        ParseStats {
            total_lines: self.total_lines.load(Ordering::Relaxed),
            observations_parsed: self.observations_parsed.load(Ordering::Relaxed),
            lines_skipped: self.lines_skipped.load(Ordering::Relaxed),
            observations_filtered: self.observations_filtered.load(Ordering::Relaxed),
            errors: self
                .errors
                .lock()
                .map(|errors| errors.clone())
                .unwrap_or_default(),
        }
    }
}
