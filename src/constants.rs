//! Application constants for the frequency index builder
//!
//! Column names, time-bucket geometry, rarity thresholds, and scheduler
//! defaults used throughout the crate.

// =============================================================================
// Time Buckets
// =============================================================================

/// Number of week buckets in one year (four per calendar month)
pub const WEEKS_PER_YEAR: usize = 48;

/// Week buckets per calendar month
pub const WEEKS_PER_MONTH: u32 = 4;

// =============================================================================
// Rarity Classification
// =============================================================================

/// Number of most recent distinct years retained per species entry
pub const YEARS_TO_CHECK: u8 = 5;

/// A species seen in at most this many window years is classified rare
pub const MIN_HIT_YEARS: u8 = 4;

// =============================================================================
// Ingestion Scheduler Defaults
// =============================================================================

/// Pending job count above which the producer blocks
pub const DEFAULT_HIGH_WATER_MARK: usize = 1_000_000;

/// Pending job count below which a blocked producer resumes
pub const DEFAULT_LOW_WATER_MARK: usize = 5_000;

/// Worker threads per logical CPU
pub const WORKERS_PER_CPU: usize = 2;

/// Emit a progress log line every this many lines
pub const PROGRESS_LOG_INTERVAL: usize = 1_000_000;

/// Maximum parse error messages retained in statistics
pub const MAX_RECORDED_ERRORS: usize = 100;

/// Region files written concurrently
pub const DEFAULT_WRITE_CONCURRENCY: usize = 8;

// =============================================================================
// Input Format
// =============================================================================

/// Field delimiter in the source dataset
pub const FIELD_DELIMITER: char = '\t';

/// Observation count token meaning "present but not counted"
pub const PRESENT_UNCOUNTED: &str = "X";

/// Observation date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Observation start time format
pub const TIME_FORMAT: &str = "%H:%M";

/// Region code hierarchy separator
pub const REGION_SEPARATOR: char = '-';

/// Source dataset column names
pub mod columns {
    pub const GLOBAL_UNIQUE_IDENTIFIER: &str = "GLOBAL UNIQUE IDENTIFIER";
    pub const COMMON_NAME: &str = "COMMON NAME";
    pub const OBSERVATION_COUNT: &str = "OBSERVATION COUNT";
    pub const COUNTRY_CODE: &str = "COUNTRY CODE";
    pub const STATE_CODE: &str = "STATE CODE";
    pub const COUNTY_CODE: &str = "COUNTY CODE";
    pub const LOCALITY: &str = "LOCALITY";
    pub const LOCALITY_ID: &str = "LOCALITY ID";
    pub const LATITUDE: &str = "LATITUDE";
    pub const LONGITUDE: &str = "LONGITUDE";
    pub const OBSERVATION_DATE: &str = "OBSERVATION DATE";
    pub const TIME_OBSERVATIONS_STARTED: &str = "TIME OBSERVATIONS STARTED";
    pub const SAMPLING_EVENT_IDENTIFIER: &str = "SAMPLING EVENT IDENTIFIER";
    pub const DURATION_MINUTES: &str = "DURATION MINUTES";
    pub const EFFORT_DISTANCE_KM: &str = "EFFORT DISTANCE KM";
    pub const ALL_SPECIES_REPORTED: &str = "ALL SPECIES REPORTED";
    pub const GROUP_IDENTIFIER: &str = "GROUP IDENTIFIER";
    pub const APPROVED: &str = "APPROVED";
}

// =============================================================================
// Output Layout
// =============================================================================

/// Extension of per-region binary frequency files
pub const FREQUENCY_FILE_EXTENSION: &str = "bin";

/// Species name index side file
pub const NAME_INDEX_FILENAME: &str = "species_index.csv";

/// Largest weekly checklist count a region file can hold; larger counts saturate
pub const MAX_STORED_CHECKLISTS: u32 = u16::MAX as u32;

/// Output directory name under the user data directory
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "ebd-frequency";

/// Mean Earth radius used for locality distance checks
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Country segment of a region code
pub fn country_of(region_code: &str) -> &str {
    region_code
        .split(REGION_SEPARATOR)
        .next()
        .unwrap_or(region_code)
}

/// Depth of a region code in the hierarchy (number of separators)
pub fn region_depth(region_code: &str) -> usize {
    region_code.matches(REGION_SEPARATOR).count()
}

/// Whether `child` lies strictly below `parent` in the region hierarchy
pub fn is_subregion_of(child: &str, parent: &str) -> bool {
    child.len() > parent.len()
        && child.starts_with(parent)
        && child[parent.len()..].starts_with(REGION_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_of() {
        assert_eq!(country_of("US-CA-001"), "US");
        assert_eq!(country_of("US"), "US");
    }

    #[test]
    fn test_region_depth() {
        assert_eq!(region_depth("US"), 0);
        assert_eq!(region_depth("US-CA"), 1);
        assert_eq!(region_depth("US-CA-001"), 2);
    }

    #[test]
    fn test_subregion_detection() {
        assert!(is_subregion_of("US-CA", "US"));
        assert!(is_subregion_of("US-CA-001", "US-CA"));
        assert!(!is_subregion_of("US", "US"));
        assert!(!is_subregion_of("USA-X", "US"));
        assert!(!is_subregion_of("US-CAL", "US-CA"));
    }
}
