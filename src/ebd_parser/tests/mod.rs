//! Test utilities for observation parser testing
//!
//! Provides a full-width header and a row builder so individual tests only
//! spell out the fields they care about.

use crate::constants::columns;

mod record_parser_tests;

/// Header carrying every known column plus two the parser ignores
pub fn full_header() -> String {
    [
        columns::GLOBAL_UNIQUE_IDENTIFIER,
        "LAST EDITED DATE",
        columns::COMMON_NAME,
        columns::OBSERVATION_COUNT,
        columns::COUNTRY_CODE,
        columns::STATE_CODE,
        columns::COUNTY_CODE,
        columns::LOCALITY,
        columns::LOCALITY_ID,
        columns::LATITUDE,
        columns::LONGITUDE,
        columns::OBSERVATION_DATE,
        columns::TIME_OBSERVATIONS_STARTED,
        columns::SAMPLING_EVENT_IDENTIFIER,
        columns::DURATION_MINUTES,
        columns::EFFORT_DISTANCE_KM,
        columns::ALL_SPECIES_REPORTED,
        columns::GROUP_IDENTIFIER,
        columns::APPROVED,
        "TRIP COMMENTS",
    ]
    .join("\t")
}

/// Row builder matching [`full_header`]
#[derive(Debug, Clone)]
pub struct RowBuilder {
    pub unique_id: String,
    pub common_name: String,
    pub count: String,
    pub country: String,
    pub state: String,
    pub county: String,
    pub latitude: String,
    pub longitude: String,
    pub date: String,
    pub time: String,
    pub checklist: String,
    pub duration: String,
    pub distance: String,
    pub complete: String,
    pub group: String,
    pub approved: String,
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self {
            unique_id: "URN:CornellLabOfOrnithology:EBIRD:OBS1".to_string(),
            common_name: "Mallard".to_string(),
            count: "3".to_string(),
            country: "US".to_string(),
            state: "US-CA".to_string(),
            county: "US-CA-001".to_string(),
            latitude: "37.8".to_string(),
            longitude: "-122.2".to_string(),
            date: "2020-05-09".to_string(),
            time: "07:15".to_string(),
            checklist: "S100".to_string(),
            duration: "45".to_string(),
            distance: "1.2".to_string(),
            complete: "1".to_string(),
            group: String::new(),
            approved: "1".to_string(),
        }
    }
}

impl RowBuilder {
    pub fn build(&self) -> String {
        [
            self.unique_id.as_str(),
            "2020-05-10 10:00:00",
            &self.common_name,
            &self.count,
            &self.country,
            &self.state,
            &self.county,
            "Lake Merritt",
            "L123",
            &self.latitude,
            &self.longitude,
            &self.date,
            &self.time,
            &self.checklist,
            &self.duration,
            &self.distance,
            &self.complete,
            &self.group,
            &self.approved,
            "",
        ]
        .join("\t")
    }
}
