//! Field parsing utilities for tab-delimited records
//!
//! Helpers for pulling typed values out of a split line with consistent
//! handling of unmapped columns, short rows, and blank values.

use super::column_mapping::{ColumnMapping, Field};
use crate::constants::{DATE_FORMAT, PRESENT_UNCOUNTED, TIME_FORMAT};
use crate::error::ParseError;
use crate::models::ObservationCount;
use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

/// Get an optional field value; unmapped, missing and blank all yield `None`
pub fn get_optional_field<'a>(
    fields: &[&'a str],
    mapping: &ColumnMapping,
    field: Field,
) -> Option<&'a str> {
    mapping
        .index_of(field)
        .and_then(|index| fields.get(index))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Get a required field value
pub fn get_required_field<'a>(
    fields: &[&'a str],
    mapping: &ColumnMapping,
    field: Field,
) -> Result<&'a str, ParseError> {
    get_optional_field(fields, mapping, field).ok_or(ParseError::MissingField {
        field: field.column_name(),
    })
}

/// Get a field value as an owned string, empty when absent
pub fn get_string_or_default(fields: &[&str], mapping: &ColumnMapping, field: Field) -> String {
    get_optional_field(fields, mapping, field)
        .unwrap_or_default()
        .to_string()
}

/// Parse an optional numeric field. Absent is `Ok(None)`, present but
/// unparseable fails the line.
pub fn parse_optional_number<T: FromStr>(
    fields: &[&str],
    mapping: &ColumnMapping,
    field: Field,
) -> Result<Option<T>, ParseError> {
    match get_optional_field(fields, mapping, field) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ParseError::invalid(field.column_name(), value)),
    }
}

/// Parse a `0`/`1` flag, falling back to `default` when absent
pub fn parse_flag(
    fields: &[&str],
    mapping: &ColumnMapping,
    field: Field,
    default: bool,
) -> Result<bool, ParseError> {
    match get_optional_field(fields, mapping, field) {
        None => Ok(default),
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        Some(other) => Err(ParseError::invalid(field.column_name(), other)),
    }
}

/// Parse the required observation date (`YYYY-MM-DD`)
pub fn parse_required_date(
    fields: &[&str],
    mapping: &ColumnMapping,
    field: Field,
) -> Result<NaiveDate, ParseError> {
    let value = get_required_field(fields, mapping, field)?;
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ParseError::invalid(field.column_name(), value))
}

/// Parse an optional start time (`HH:MM`, seconds tolerated)
pub fn parse_optional_time(
    fields: &[&str],
    mapping: &ColumnMapping,
    field: Field,
) -> Result<Option<NaiveTime>, ParseError> {
    match get_optional_field(fields, mapping, field) {
        None => Ok(None),
        Some(value) => NaiveTime::parse_from_str(value, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .map(Some)
            .map_err(|_| ParseError::invalid(field.column_name(), value)),
    }
}

/// Parse the observation count; `X` means present but uncounted
pub fn parse_count(
    fields: &[&str],
    mapping: &ColumnMapping,
    field: Field,
) -> Result<Option<ObservationCount>, ParseError> {
    match get_optional_field(fields, mapping, field) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case(PRESENT_UNCOUNTED) => {
            Ok(Some(ObservationCount::Present))
        }
        Some(value) => value
            .parse::<u32>()
            .map(|n| Some(ObservationCount::Counted(n)))
            .map_err(|_| ParseError::invalid(field.column_name(), value)),
    }
}

/// Finest available region code: county, then state, then country
pub fn resolve_region_code(
    fields: &[&str],
    mapping: &ColumnMapping,
) -> Result<String, ParseError> {
    [Field::CountyCode, Field::StateCode, Field::CountryCode]
        .into_iter()
        .find_map(|field| get_optional_field(fields, mapping, field))
        .map(str::to_string)
        .ok_or(ParseError::NoRegion)
}
