//! Column mapping for the tab-delimited observation header
//!
//! Resolves each known semantic field to its column position so that data
//! lines can be split once and indexed directly.

use crate::constants::{FIELD_DELIMITER, columns};
use crate::{IndexError, Result};
use tracing::{debug, warn};

/// Semantic fields recognised in the source header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UniqueId,
    CommonName,
    ObservationCount,
    CountryCode,
    StateCode,
    CountyCode,
    Locality,
    LocalityId,
    Latitude,
    Longitude,
    ObservationDate,
    TimeStarted,
    ChecklistId,
    DurationMinutes,
    DistanceKm,
    AllSpeciesReported,
    GroupId,
    Approved,
}

impl Field {
    pub const COUNT: usize = 18;

    pub const ALL: [Field; Field::COUNT] = [
        Field::UniqueId,
        Field::CommonName,
        Field::ObservationCount,
        Field::CountryCode,
        Field::StateCode,
        Field::CountyCode,
        Field::Locality,
        Field::LocalityId,
        Field::Latitude,
        Field::Longitude,
        Field::ObservationDate,
        Field::TimeStarted,
        Field::ChecklistId,
        Field::DurationMinutes,
        Field::DistanceKm,
        Field::AllSpeciesReported,
        Field::GroupId,
        Field::Approved,
    ];

    /// Exact header name of the column carrying this field
    pub fn column_name(self) -> &'static str {
        match self {
            Field::UniqueId => columns::GLOBAL_UNIQUE_IDENTIFIER,
            Field::CommonName => columns::COMMON_NAME,
            Field::ObservationCount => columns::OBSERVATION_COUNT,
            Field::CountryCode => columns::COUNTRY_CODE,
            Field::StateCode => columns::STATE_CODE,
            Field::CountyCode => columns::COUNTY_CODE,
            Field::Locality => columns::LOCALITY,
            Field::LocalityId => columns::LOCALITY_ID,
            Field::Latitude => columns::LATITUDE,
            Field::Longitude => columns::LONGITUDE,
            Field::ObservationDate => columns::OBSERVATION_DATE,
            Field::TimeStarted => columns::TIME_OBSERVATIONS_STARTED,
            Field::ChecklistId => columns::SAMPLING_EVENT_IDENTIFIER,
            Field::DurationMinutes => columns::DURATION_MINUTES,
            Field::DistanceKm => columns::EFFORT_DISTANCE_KM,
            Field::AllSpeciesReported => columns::ALL_SPECIES_REPORTED,
            Field::GroupId => columns::GROUP_IDENTIFIER,
            Field::Approved => columns::APPROVED,
        }
    }

    /// Fields the source format always carries. The optional ones
    /// (time, duration, distance, group) are legitimately absent from
    /// some exports and are not worth a warning.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Field::TimeStarted | Field::DurationMinutes | Field::DistanceKm | Field::GroupId
        )
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Field to column index table built from the header line
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    indices: [Option<usize>; Field::COUNT],
    column_count: usize,
}

impl ColumnMapping {
    /// Analyze the header line. Unknown columns are ignored and unmapped
    /// required fields are logged; only a header that maps nothing at all
    /// is rejected.
    pub fn analyze(header: &str) -> Result<Self> {
        let header = header.trim_end_matches(['\r', '\n']);
        if header.trim().is_empty() {
            return Err(IndexError::invalid_header("header line is empty"));
        }

        let mut indices = [None; Field::COUNT];
        let mut column_count = 0;

        for (index, name) in header.split(FIELD_DELIMITER).enumerate() {
            column_count = index + 1;
            let name = name.trim();
            if let Some(field) = Field::ALL.iter().find(|f| f.column_name() == name) {
                // First occurrence wins if a name is duplicated
                if indices[field.slot()].is_none() {
                    indices[field.slot()] = Some(index);
                }
            }
        }

        let mapping = Self {
            indices,
            column_count,
        };

        if mapping.mapped_count() == 0 {
            return Err(IndexError::invalid_header(format!(
                "none of the {} known columns found in {} header fields",
                Field::COUNT,
                column_count
            )));
        }

        for field in mapping.unmapped_required() {
            warn!(
                "Required column '{}' not found in header, using defaults",
                field.column_name()
            );
        }

        debug!(
            "Column mapping: {} of {} fields mapped across {} columns",
            mapping.mapped_count(),
            Field::COUNT,
            column_count
        );

        Ok(mapping)
    }

    /// Column index for a field, if the header carries it
    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.indices[field.slot()]
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.index_of(field).is_some()
    }

    pub fn mapped_count(&self) -> usize {
        self.indices.iter().filter(|i| i.is_some()).count()
    }

    /// Number of columns in the header line
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn unmapped_required(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| f.is_required() && !self.has_field(*f))
            .collect()
    }
}
