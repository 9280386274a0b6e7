//! Tests for individual line parsing

use super::{RowBuilder, full_header};
use crate::ebd_parser::column_mapping::ColumnMapping;
use crate::ebd_parser::record_parser::{parse_observation_bytes, parse_observation_line};
use crate::error::ParseError;
use crate::models::ObservationCount;
use chrono::{NaiveDate, NaiveTime};

fn mapping() -> ColumnMapping {
    ColumnMapping::analyze(&full_header()).unwrap()
}

#[test]
fn test_parse_complete_row() {
    let row = RowBuilder::default().build();
    let obs = parse_observation_line(&row, &mapping()).unwrap();

    assert_eq!(obs.common_name, "Mallard");
    assert_eq!(obs.checklist_id, "S100");
    assert_eq!(obs.region_code, "US-CA-001");
    assert_eq!(obs.date, NaiveDate::from_ymd_opt(2020, 5, 9).unwrap());
    assert_eq!(obs.time, NaiveTime::from_hms_opt(7, 15, 0));
    assert_eq!(obs.count, Some(ObservationCount::Counted(3)));
    assert_eq!(obs.duration_minutes, Some(45));
    assert_eq!(obs.distance_km, Some(1.2));
    assert_eq!(obs.group_id, None);
    assert!(obs.complete_checklist);
    assert!(obs.approved);
    assert_eq!(obs.locality, "Lake Merritt");
    assert_eq!(obs.locality_id, "L123");
    assert!((obs.location.latitude - 37.8).abs() < 1e-9);
    assert_eq!(obs.week(), 17);
}

#[test]
fn test_present_uncounted() {
    let row = RowBuilder {
        count: "X".to_string(),
        ..Default::default()
    }
    .build();

    let obs = parse_observation_line(&row, &mapping()).unwrap();
    assert_eq!(obs.count, Some(ObservationCount::Present));
}

#[test]
fn test_invalid_count_rejects_line() {
    let row = RowBuilder {
        count: "many".to_string(),
        ..Default::default()
    }
    .build();

    let err = parse_observation_line(&row, &mapping()).unwrap_err();
    assert_eq!(err, ParseError::invalid("OBSERVATION COUNT", "many"));
}

#[test]
fn test_region_falls_back_to_state() {
    let row = RowBuilder {
        county: String::new(),
        ..Default::default()
    }
    .build();

    let obs = parse_observation_line(&row, &mapping()).unwrap();
    assert_eq!(obs.region_code, "US-CA");
}

#[test]
fn test_region_falls_back_to_country() {
    let row = RowBuilder {
        county: String::new(),
        state: String::new(),
        ..Default::default()
    }
    .build();

    let obs = parse_observation_line(&row, &mapping()).unwrap();
    assert_eq!(obs.region_code, "US");
}

#[test]
fn test_no_region_rejects_line() {
    let row = RowBuilder {
        county: String::new(),
        state: String::new(),
        country: String::new(),
        ..Default::default()
    }
    .build();

    let err = parse_observation_line(&row, &mapping()).unwrap_err();
    assert_eq!(err, ParseError::NoRegion);
}

#[test]
fn test_optional_fields_absent() {
    let row = RowBuilder {
        time: String::new(),
        duration: String::new(),
        distance: String::new(),
        count: String::new(),
        group: "G42".to_string(),
        ..Default::default()
    }
    .build();

    let obs = parse_observation_line(&row, &mapping()).unwrap();
    assert_eq!(obs.time, None);
    assert_eq!(obs.duration_minutes, None);
    assert_eq!(obs.distance_km, None);
    assert_eq!(obs.count, None);
    assert_eq!(obs.group_id.as_deref(), Some("G42"));
}

#[test]
fn test_bad_date_rejects_line() {
    let row = RowBuilder {
        date: "2020/05/09".to_string(),
        ..Default::default()
    }
    .build();

    assert!(matches!(
        parse_observation_line(&row, &mapping()),
        Err(ParseError::InvalidValue {
            field: "OBSERVATION DATE",
            ..
        })
    ));
}

#[test]
fn test_missing_common_name_rejects_line() {
    let row = RowBuilder {
        common_name: String::new(),
        ..Default::default()
    }
    .build();

    assert_eq!(
        parse_observation_line(&row, &mapping()).unwrap_err(),
        ParseError::MissingField {
            field: "COMMON NAME"
        }
    );
}

#[test]
fn test_bad_flag_rejects_line() {
    let row = RowBuilder {
        approved: "yes".to_string(),
        ..Default::default()
    }
    .build();

    assert!(parse_observation_line(&row, &mapping()).is_err());
}

#[test]
fn test_unapproved_and_incomplete_flags() {
    let row = RowBuilder {
        approved: "0".to_string(),
        complete: "0".to_string(),
        ..Default::default()
    }
    .build();

    let obs = parse_observation_line(&row, &mapping()).unwrap();
    assert!(!obs.approved);
    assert!(!obs.complete_checklist);
}

#[test]
fn test_defaults_when_columns_unmapped() {
    let mapping = ColumnMapping::analyze(
        "COMMON NAME\tSAMPLING EVENT IDENTIFIER\tSTATE CODE\tOBSERVATION DATE",
    )
    .unwrap();

    let obs = parse_observation_line("Killdeer\tS9\tUS-NY\t2019-12-31", &mapping).unwrap();
    assert_eq!(obs.region_code, "US-NY");
    assert!(obs.approved);
    assert!(!obs.complete_checklist);
    assert_eq!(obs.location.latitude, 0.0);
    assert_eq!(obs.unique_id, "");
    assert!(obs.is_year_end());
}

#[test]
fn test_short_row_uses_defaults_for_missing_trailing_fields() {
    let mapping =
        ColumnMapping::analyze("COMMON NAME\tSAMPLING EVENT IDENTIFIER\tCOUNTRY CODE\tOBSERVATION DATE\tAPPROVED")
            .unwrap();

    let obs = parse_observation_line("Killdeer\tS9\tCA\t2019-06-01", &mapping).unwrap();
    assert!(obs.approved);
}

#[test]
fn test_crlf_line_endings() {
    let row = format!("{}\r\n", RowBuilder::default().build());
    let obs = parse_observation_line(&row, &mapping()).unwrap();
    assert_eq!(obs.checklist_id, "S100");
}

#[test]
fn test_invalid_utf8_rejected() {
    let bytes = [0x4d, 0xff, 0xfe, b'\t'];
    assert_eq!(
        parse_observation_bytes(&bytes, &mapping()).unwrap_err(),
        ParseError::Encoding
    );
}
