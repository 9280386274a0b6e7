//! Species name index side file (`name,index` CSV).

use crate::aggregator::NameIndex;
use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct NameRecord {
    name: String,
    index: u16,
}

/// Write every name with its id, in id order
pub fn save_name_index(path: &Path, names: &NameIndex) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (name, index) in names.iter() {
        writer.serialize(NameRecord {
            name: name.to_string(),
            index,
        })?;
    }
    writer.flush()?;

    debug!("Wrote {} species names to {}", names.len(), path.display());
    Ok(())
}

/// Read a name index back. Duplicate names or ids are a format error.
pub fn load_name_index(path: &Path) -> Result<NameIndex> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut names = NameIndex::new();

    for (row, record) in reader.deserialize::<NameRecord>().enumerate() {
        let record = record?;
        names
            .insert_with_id(&record.name, record.index)
            .map_err(|err| IndexError::NameIndexFormat {
                path: path.to_path_buf(),
                reason: format!("row {}: {}", row + 1, err),
            })?;
    }

    debug!("Loaded {} species names from {}", names.len(), path.display());
    Ok(names)
}
