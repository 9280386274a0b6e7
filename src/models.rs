//! Core data structures for observation ingestion.
//!
//! Defines the parsed observation record, week bucketing, and the small
//! value types shared by the parser, aggregator, and scheduler.

use crate::constants::{EARTH_RADIUS_KM, WEEKS_PER_MONTH, WEEKS_PER_YEAR};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Number of individuals reported for a sighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationCount {
    /// Species present but not counted (`X` in the source)
    Present,
    Counted(u32),
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// One parsed row of the source dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub unique_id: String,
    pub common_name: String,
    pub checklist_id: String,
    pub group_id: Option<String>,
    /// Finest available region code, never empty
    pub region_code: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub count: Option<ObservationCount>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<u32>,
    pub complete_checklist: bool,
    pub approved: bool,
    pub location: Coordinates,
    pub locality: String,
    pub locality_id: String,
}

impl Observation {
    /// Week bucket of the observation date
    pub fn week(&self) -> usize {
        week_bucket(self.date)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Dec 31 sightings advance the session reference year
    pub fn is_year_end(&self) -> bool {
        self.date.month() == 12 && self.date.day() == 31
    }
}

/// Map a date to one of 48 week buckets: four per month, the last one
/// absorbing days 22 through the end of the month.
pub fn week_bucket(date: NaiveDate) -> usize {
    let month_offset = (date.month0() * WEEKS_PER_MONTH) as usize;
    let within_month = (date.day0() / 7).min(WEEKS_PER_MONTH - 1) as usize;
    let week = month_offset + within_month;
    debug_assert!(week < WEEKS_PER_YEAR);
    week
}

/// First calendar month (1-12) covered by a week bucket
pub fn month_of_week(week: usize) -> u32 {
    (week / WEEKS_PER_MONTH as usize) as u32 + 1
}
