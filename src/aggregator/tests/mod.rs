//! Test utilities for aggregation testing

use crate::aggregator::{AggregationMode, FrequencyAggregator, IncludeAll, TaxonomicFilter};
use crate::models::{Coordinates, Observation};
use crate::rarity::RarityPolicy;
use chrono::NaiveDate;

mod mode_tests;
mod table_tests;

/// Approved, complete sighting in `US-CA-001` on 2020-05-09
pub fn observation(species: &str, checklist: &str) -> Observation {
    Observation {
        unique_id: format!("OBS-{}-{}", checklist, species),
        common_name: species.to_string(),
        checklist_id: checklist.to_string(),
        group_id: None,
        region_code: "US-CA-001".to_string(),
        date: NaiveDate::from_ymd_opt(2020, 5, 9).unwrap(),
        time: None,
        count: None,
        distance_km: None,
        duration_minutes: None,
        complete_checklist: true,
        approved: true,
        location: Coordinates::new(37.8, -122.2),
        locality: "Lake Merritt".to_string(),
        locality_id: "L123".to_string(),
    }
}

pub fn on_date(mut observation: Observation, y: i32, m: u32, d: u32) -> Observation {
    observation.date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    observation
}

pub fn in_region(mut observation: Observation, region: &str) -> Observation {
    observation.region_code = region.to_string();
    observation
}

pub fn frequency_aggregator() -> FrequencyAggregator {
    FrequencyAggregator::new(
        AggregationMode::Frequency,
        RarityPolicy::default(),
        Box::new(TaxonomicFilter::default()),
    )
}

pub fn permissive_aggregator(mode: AggregationMode) -> FrequencyAggregator {
    FrequencyAggregator::new(mode, RarityPolicy::default(), Box::new(IncludeAll))
}
