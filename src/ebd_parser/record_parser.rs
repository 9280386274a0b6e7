//! Individual line parsing for the observation dataset
//!
//! A line either becomes a complete [`Observation`] or is rejected with a
//! [`ParseError`]; nothing partial escapes.

use super::column_mapping::{ColumnMapping, Field};
use super::field_parsers::{
    get_optional_field, get_required_field, get_string_or_default, parse_count, parse_flag,
    parse_optional_number, parse_optional_time, parse_required_date, resolve_region_code,
};
use crate::constants::FIELD_DELIMITER;
use crate::error::ParseError;
use crate::models::{Coordinates, Observation};

/// Parse one data line against the header's column map
pub fn parse_observation_line(
    line: &str,
    mapping: &ColumnMapping,
) -> Result<Observation, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    let common_name = get_required_field(&fields, mapping, Field::CommonName)?.to_string();
    let checklist_id = get_required_field(&fields, mapping, Field::ChecklistId)?.to_string();
    let date = parse_required_date(&fields, mapping, Field::ObservationDate)?;
    let region_code = resolve_region_code(&fields, mapping)?;

    let latitude = parse_optional_number::<f64>(&fields, mapping, Field::Latitude)?;
    let longitude = parse_optional_number::<f64>(&fields, mapping, Field::Longitude)?;

    Ok(Observation {
        unique_id: get_string_or_default(&fields, mapping, Field::UniqueId),
        common_name,
        checklist_id,
        group_id: get_optional_string(&fields, mapping, Field::GroupId),
        region_code,
        date,
        time: parse_optional_time(&fields, mapping, Field::TimeStarted)?,
        count: parse_count(&fields, mapping, Field::ObservationCount)?,
        distance_km: parse_optional_number(&fields, mapping, Field::DistanceKm)?,
        duration_minutes: parse_optional_number(&fields, mapping, Field::DurationMinutes)?,
        complete_checklist: parse_flag(&fields, mapping, Field::AllSpeciesReported, false)?,
        approved: parse_flag(&fields, mapping, Field::Approved, true)?,
        location: Coordinates::new(latitude.unwrap_or(0.0), longitude.unwrap_or(0.0)),
        locality: get_string_or_default(&fields, mapping, Field::Locality),
        locality_id: get_string_or_default(&fields, mapping, Field::LocalityId),
    })
}

/// Parse a raw byte line, rejecting invalid UTF-8
pub fn parse_observation_bytes(
    line: &[u8],
    mapping: &ColumnMapping,
) -> Result<Observation, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::Encoding)?;
    parse_observation_line(line, mapping)
}

fn get_optional_string(fields: &[&str], mapping: &ColumnMapping, field: Field) -> Option<String> {
    get_optional_field(fields, mapping, field).map(str::to_string)
}
