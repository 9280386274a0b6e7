//! Species common name to compact id mapping
//!
//! Ids are allocated densely in first-seen order and never reused, so an id
//! written into any region file stays valid for the whole session.

use crate::{IndexError, Result};
use std::collections::HashMap;

/// Bidirectional common name <-> `u16` id map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameIndex {
    by_name: HashMap<String, u16>,
    names: Vec<String>,
}

impl NameIndex {
    pub const CAPACITY: usize = u16::MAX as usize + 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, allocating the next one if unseen
    pub fn get_or_insert(&mut self, name: &str) -> Result<u16> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }

        let id = u16::try_from(self.names.len()).map_err(|_| IndexError::NameIndexFull {
            name: name.to_string(),
            capacity: Self::CAPACITY,
        })?;
        self.by_name.insert(name.to_string(), id);
        self.names.push(name.to_string());
        Ok(id)
    }

    /// Insert a name with a known id, as read back from the side file
    pub fn insert_with_id(&mut self, name: &str, id: u16) -> Result<()> {
        let slot = usize::from(id);
        if let Some(existing) = self.by_name.get(name) {
            return Err(IndexError::name_conflict(
                name,
                id,
                format!("already listed with id {}", existing),
            ));
        }
        if self.names.len() <= slot {
            self.names.resize(slot + 1, String::new());
        }
        if !self.names[slot].is_empty() {
            return Err(IndexError::name_conflict(
                name,
                id,
                format!("id already assigned to '{}'", self.names[slot]),
            ));
        }
        self.names[slot] = name.to_string();
        self.by_name.insert(name.to_string(), id);
        Ok(())
    }

    pub fn id_of(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: u16) -> Option<&str> {
        self.names
            .get(usize::from(id))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// `(name, id)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(id, name)| (name.as_str(), id as u16))
    }
}
