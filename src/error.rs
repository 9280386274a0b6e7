//! Error handling for frequency index construction.
//!
//! Setup failures (missing source, unreadable header) abort a run, per-line
//! failures are carried as [`ParseError`] and never escalate, and per-region
//! write failures are collected by the writer rather than returned early.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source dataset not found at path: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Invalid header line: {reason}")]
    InvalidHeader { reason: String },

    #[error("Line {line_number} rejected: {source}")]
    Line {
        line_number: usize,
        #[source]
        source: ParseError,
    },

    #[error("Species name index is full ({capacity} names), cannot add '{name}'")]
    NameIndexFull { name: String, capacity: usize },

    #[error("Species '{name}' conflicts with id {id}: {reason}")]
    NameConflict { name: String, id: u16, reason: String },

    #[error("Species name index file {path} is malformed: {reason}")]
    NameIndexFormat { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Frequency file for region {region} is truncated or corrupt: {reason}")]
    Decode { region: String, reason: String },

    #[error("No frequency file for region {region} under {path}")]
    RegionNotFound { region: String, path: PathBuf },

    #[error("Failed to write region {region} to {path}: {source}")]
    RegionWrite {
        region: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Worker task failed: {reason}")]
    Worker { reason: String },
}

impl IndexError {
    /// Create a header error
    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a decode error for a region's frequency file
    pub fn decode(region: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            region: region.into(),
            reason: reason.into(),
        }
    }

    /// Create a name/id conflict error
    pub fn name_conflict(name: impl Into<String>, id: u16, reason: impl Into<String>) -> Self {
        Self::NameConflict {
            name: name.into(),
            id,
            reason: reason.into(),
        }
    }

    /// Create a region write error
    pub fn region_write(
        region: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::RegionWrite {
            region: region.into(),
            path: path.into(),
            source,
        }
    }
}

/// Reasons a single data line is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("no country, state or county code")]
    NoRegion,

    #[error("line is not valid UTF-8")]
    Encoding,
}

impl ParseError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
