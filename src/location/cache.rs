//! File-based school location cache (`location_cache.json` in the output dir).
//!
//! No TTL and no eviction: once a school is resolved (or found unresolvable)
//! the record is reused by every later run. Any read or parse failure yields an
//! empty cache.

use super::types::LocationRecord;
use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The location cache, keyed by school name exactly as it appears in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationCache {
    entries: BTreeMap<String, LocationRecord>,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from `path`, or start empty if it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let entries = Self::read_file(path).unwrap_or_default();
        if !entries.is_empty() {
            info!("Loaded location cache ({} entries) from {}", entries.len(), path.display());
        }
        Self { entries }
    }

    fn read_file(path: &Path) -> Option<BTreeMap<String, LocationRecord>> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                debug!("No usable cache at {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!("Ignoring unreadable cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the whole cache to `path`, replacing whatever was there.
    ///
    /// The JSON goes to a sibling temp file first and is renamed into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| Error::io(path, e))?;
        info!("Saved location cache ({} entries) to {}", self.entries.len(), path.display());
        Ok(())
    }

    pub fn get(&self, school: &str) -> Option<&LocationRecord> {
        self.entries.get(school)
    }

    pub fn insert(&mut self, school: &str, record: LocationRecord) {
        self.entries.insert(school.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
