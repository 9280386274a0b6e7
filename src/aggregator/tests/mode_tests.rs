//! Tests for aggregation modes

use super::{observation, on_date, permissive_aggregator};
use crate::IndexError;
use crate::aggregator::{AggregateOutcome, AggregationMode};
use crate::models::Coordinates;
use chrono::NaiveDate;

fn trip_mode() -> AggregationMode {
    AggregationMode::TripPlanning {
        month: 5,
        center: Coordinates::new(37.8, -122.2),
        radius_km: 25.0,
    }
}

#[test]
fn test_frequency_mode_admits_everything() {
    assert!(AggregationMode::Frequency.admits(&observation("Mallard", "S1")));
}

#[test]
fn test_trip_mode_requires_month_and_radius() {
    let mode = trip_mode();

    assert!(mode.admits(&observation("Mallard", "S1")));
    assert!(!mode.admits(&on_date(observation("Mallard", "S1"), 2020, 6, 9)));

    let mut far = observation("Mallard", "S1");
    far.location = Coordinates::new(34.05, -118.25);
    assert!(!mode.admits(&far));
}

#[test]
fn test_date_range_is_inclusive() {
    let mode = AggregationMode::DateRange {
        start: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2020, 5, 9).unwrap(),
    };

    assert!(mode.admits(&observation("Mallard", "S1")));
    assert!(mode.admits(&on_date(observation("Mallard", "S1"), 2020, 5, 1)));
    assert!(!mode.admits(&on_date(observation("Mallard", "S1"), 2020, 5, 10)));
    assert!(!mode.admits(&on_date(observation("Mallard", "S1"), 2020, 4, 30)));
}

#[test]
fn test_mode_validation() {
    assert!(AggregationMode::Frequency.validate().is_ok());
    assert!(trip_mode().validate().is_ok());

    let bad_month = AggregationMode::TripPlanning {
        month: 13,
        center: Coordinates::new(0.0, 0.0),
        radius_km: 5.0,
    };
    assert!(matches!(
        bad_month.validate(),
        Err(IndexError::Configuration { .. })
    ));

    let bad_radius = AggregationMode::TripPlanning {
        month: 1,
        center: Coordinates::new(0.0, 0.0),
        radius_km: 0.0,
    };
    assert!(matches!(
        bad_radius.validate(),
        Err(IndexError::Configuration { .. })
    ));

    let inverted = AggregationMode::DateRange {
        start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    };
    assert!(matches!(
        inverted.validate(),
        Err(IndexError::Configuration { .. })
    ));
}

#[test]
fn test_outside_mode_is_not_aggregated() {
    let aggregator = permissive_aggregator(trip_mode());
    let outcome = aggregator
        .apply(&on_date(observation("Mallard", "S1"), 2020, 12, 31))
        .unwrap();
    assert_eq!(outcome, AggregateOutcome::OutsideMode);

    let index = aggregator.finish();
    assert!(index.regions.is_empty());
    // Filtered year-end sightings do not set the reference year
    assert_eq!(index.reference_year, None);
}

#[test]
fn test_mode_display() {
    assert_eq!(AggregationMode::Frequency.to_string(), "frequency");
    assert!(trip_mode().to_string().starts_with("trip planning (month 5"));
}
