//! Byte layout of a region frequency file.
//!
//! A file is exactly 48 week records back to back, all integers and floats
//! little-endian:
//!
//! ```text
//! week    := checklists:u16 species_count:u16 rarity_window:u8 entry*
//! entry   := species_id:u16 frequency:f64 rarity:u8 [years_observed:u8]
//! ```
//!
//! `years_observed` is present only when `rarity` is 1. There is no magic,
//! version byte, or terminator; a file that does not end exactly after the
//! 48th week is corrupt.
//!
//! `checklists` saturates at 65,535. Frequencies keep the percentage of the
//! true count, so they stay exact while the stored count is only a floor.

use crate::constants::{MAX_STORED_CHECKLISTS, WEEKS_PER_YEAR};
use crate::error::{IndexError, Result};
use crate::frequencies::{RegionFrequencies, SpeciesFrequency, WeekFrequencies};
use std::io;
use tracing::warn;

const WEEK_HEADER_LEN: usize = 2 + 2 + 1;
const ENTRY_LEN: usize = 2 + 8 + 1;

/// Encode one region's 48 weeks
pub fn encode_region(region: &RegionFrequencies) -> io::Result<Vec<u8>> {
    if region.weeks.len() != WEEKS_PER_YEAR {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "region {} has {} weeks, expected {}",
                region.region_code,
                region.weeks.len(),
                WEEKS_PER_YEAR
            ),
        ));
    }

    let capacity = region
        .weeks
        .iter()
        .map(|w| WEEK_HEADER_LEN + w.species.len() * (ENTRY_LEN + 1))
        .sum();
    let mut buf = Vec::with_capacity(capacity);

    for (week_index, week) in region.weeks.iter().enumerate() {
        let checklists = u16::try_from(week.checklists).unwrap_or_else(|_| {
            warn!(
                "Region {} week {} has {} checklists, saturating at {}",
                region.region_code,
                week_index,
                week.checklists,
                MAX_STORED_CHECKLISTS
            );
            u16::MAX
        });
        let species_count = u16::try_from(week.species.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "region {} week {} has {} species, more than a week record can hold",
                    region.region_code,
                    week_index,
                    week.species.len()
                ),
            )
        })?;

        buf.extend_from_slice(&checklists.to_le_bytes());
        buf.extend_from_slice(&species_count.to_le_bytes());
        buf.push(week.rarity_window);

        for entry in &week.species {
            buf.extend_from_slice(&entry.species_id.to_le_bytes());
            buf.extend_from_slice(&entry.frequency.to_le_bytes());
            if entry.is_rarity {
                buf.push(1);
                buf.push(entry.years_observed);
            } else {
                buf.push(0);
            }
        }
    }

    Ok(buf)
}

/// Decode a region file's bytes. Errors name the offset where decoding stopped.
pub fn decode_region(region_code: &str, bytes: &[u8]) -> Result<RegionFrequencies> {
    let mut cursor = Cursor {
        region_code,
        bytes,
        pos: 0,
    };
    let mut weeks = Vec::with_capacity(WEEKS_PER_YEAR);

    for week_index in 0..WEEKS_PER_YEAR {
        let checklists = cursor.u16(week_index)?;
        let species_count = cursor.u16(week_index)?;
        let rarity_window = cursor.u8(week_index)?;

        let mut species = Vec::with_capacity(usize::from(species_count));
        for _ in 0..species_count {
            let species_id = cursor.u16(week_index)?;
            let frequency = cursor.f64(week_index)?;
            let (is_rarity, years_observed) = match cursor.u8(week_index)? {
                0 => (false, 0),
                1 => (true, cursor.u8(week_index)?),
                flag => {
                    return Err(IndexError::decode(
                        region_code,
                        format!(
                            "invalid rarity flag {} in week {} at offset {}",
                            flag,
                            week_index,
                            cursor.pos - 1
                        ),
                    ));
                }
            };
            species.push(SpeciesFrequency {
                species_id,
                frequency,
                is_rarity,
                years_observed,
            });
        }

        weeks.push(WeekFrequencies {
            checklists: u32::from(checklists),
            rarity_window,
            species,
        });
    }

    if cursor.pos != bytes.len() {
        return Err(IndexError::decode(
            region_code,
            format!(
                "{} trailing bytes after week {}",
                bytes.len() - cursor.pos,
                WEEKS_PER_YEAR - 1
            ),
        ));
    }

    Ok(RegionFrequencies {
        region_code: region_code.to_string(),
        weeks,
    })
}

struct Cursor<'a> {
    region_code: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take<const N: usize>(&mut self, week: usize) -> Result<[u8; N]> {
        let end = self.pos + N;
        let slice = self.bytes.get(self.pos..end).ok_or_else(|| {
            IndexError::decode(
                self.region_code,
                format!(
                    "unexpected end of data in week {} at offset {} (file is {} bytes)",
                    week,
                    self.pos,
                    self.bytes.len()
                ),
            )
        })?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn u8(&mut self, week: usize) -> Result<u8> {
        self.take::<1>(week).map(|b| b[0])
    }

    fn u16(&mut self, week: usize) -> Result<u16> {
        self.take::<2>(week).map(u16::from_le_bytes)
    }

    fn f64(&mut self, week: usize) -> Result<f64> {
        self.take::<8>(week).map(f64::from_le_bytes)
    }
}
