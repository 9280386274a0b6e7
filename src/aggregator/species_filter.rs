//! Species inclusion predicates
//!
//! Likelihood statistics only make sense for countable taxa, so callers
//! supply a filter that rejects hybrids, slash taxa, spuhs and domestic
//! forms before they reach the aggregator.

use crate::{IndexError, Result};
use regex::Regex;
use std::fmt::Debug;
use std::sync::LazyLock;

/// Decides whether a common name takes part in frequency statistics
pub trait SpeciesFilter: Send + Sync + Debug {
    fn includes(&self, common_name: &str) -> bool;
}

/// Matches hybrids (`x`, `hybrid`), slash taxa, spuhs and domestic forms
const NON_SPECIES_PATTERN: &str = r"(?i)(\bsp\.|/|\bx\b|\bhybrid\b|\bdomestic\b)";

static NON_SPECIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NON_SPECIES_PATTERN).expect("static pattern compiles"));

/// Default filter excluding non-species taxa by name pattern
#[derive(Debug, Clone)]
pub struct TaxonomicFilter {
    excluded: Regex,
}

impl Default for TaxonomicFilter {
    fn default() -> Self {
        Self {
            excluded: NON_SPECIES.clone(),
        }
    }
}

impl TaxonomicFilter {
    /// Filter with a caller-supplied exclusion pattern
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let excluded = Regex::new(pattern).map_err(|e| {
            IndexError::configuration(format!("invalid species exclusion pattern: {}", e))
        })?;
        Ok(Self { excluded })
    }
}

impl SpeciesFilter for TaxonomicFilter {
    fn includes(&self, common_name: &str) -> bool {
        !self.excluded.is_match(common_name)
    }
}

/// Accepts every name
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAll;

impl SpeciesFilter for IncludeAll {
    fn includes(&self, _common_name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_accepts_species() {
        let filter = TaxonomicFilter::default();
        for name in [
            "Mallard",
            "Xantus's Hummingbird",
            "Black-crowned Night-Heron",
            "Dark-eyed Junco (Oregon)",
            "Rock Pigeon",
        ] {
            assert!(filter.includes(name), "{} should be included", name);
        }
    }

    #[test]
    fn test_default_filter_rejects_non_species() {
        let filter = TaxonomicFilter::default();
        for name in [
            "duck sp.",
            "Greater/Lesser Scaup",
            "Mallard x American Black Duck (hybrid)",
            "Blue-winged x Golden-winged Warbler",
            "Mallard (Domestic type)",
            "Graylag Goose (Domestic type)",
        ] {
            assert!(!filter.includes(name), "{} should be excluded", name);
        }
    }

    #[test]
    fn test_custom_pattern() {
        let filter = TaxonomicFilter::with_pattern("^Mallard$").unwrap();
        assert!(!filter.includes("Mallard"));
        assert!(filter.includes("duck sp."));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            TaxonomicFilter::with_pattern("("),
            Err(IndexError::Configuration { .. })
        ));
    }

    #[test]
    fn test_include_all() {
        assert!(IncludeAll.includes("duck sp."));
    }
}
