//! Aggregation modes
//!
//! A session picks one mode up front; it decides per observation whether
//! the sighting belongs in the index at all.

use crate::error::{IndexError, Result};
use crate::models::{Coordinates, Observation};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum AggregationMode {
    /// Every approved sighting of an included species
    #[default]
    Frequency,
    /// Sightings in one calendar month within a radius of a point
    TripPlanning {
        month: u32,
        center: Coordinates,
        radius_km: f64,
    },
    /// Sightings between two dates, inclusive
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl AggregationMode {
    pub fn admits(&self, observation: &Observation) -> bool {
        match self {
            AggregationMode::Frequency => true,
            AggregationMode::TripPlanning {
                month,
                center,
                radius_km,
            } => {
                observation.date.month() == *month
                    && center.distance_km(&observation.location) <= *radius_km
            }
            AggregationMode::DateRange { start, end } => {
                observation.date >= *start && observation.date <= *end
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            AggregationMode::Frequency => Ok(()),
            AggregationMode::TripPlanning {
                month, radius_km, ..
            } => {
                if !(1..=12).contains(month) {
                    Err(IndexError::configuration(format!(
                        "trip month must be 1-12, got {}",
                        month
                    )))
                } else if !(*radius_km > 0.0) {
                    Err(IndexError::configuration(format!(
                        "trip radius must be positive, got {}",
                        radius_km
                    )))
                } else {
                    Ok(())
                }
            }
            AggregationMode::DateRange { start, end } => {
                if start > end {
                    Err(IndexError::configuration(format!(
                        "date range start {} is after end {}",
                        start, end
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::Frequency => write!(f, "frequency"),
            AggregationMode::TripPlanning {
                month,
                center,
                radius_km,
            } => write!(
                f,
                "trip planning (month {}, {:.1} km around {:.4},{:.4})",
                month, radius_km, center.latitude, center.longitude
            ),
            AggregationMode::DateRange { start, end } => {
                write!(f, "date range ({} to {})", start, end)
            }
        }
    }
}
