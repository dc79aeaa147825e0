//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// City label used when a school could not be placed.
pub const UNKNOWN_CITY: &str = "未知";

/// Address label used when no provider query matched.
pub const UNKNOWN_ADDRESS: &str = "未知位置";

/// A latitude/longitude pair, persisted as a two-element array.
///
/// `(0, 0)` is the sentinel for "unresolved".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub const UNRESOLVED: Coords = Coords(0.0, 0.0);

    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }

    /// True only for the exact `(0, 0)` sentinel.
    pub fn is_unresolved(&self) -> bool {
        self.0 == 0.0 && self.1 == 0.0
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.0, self.1)
    }
}

/// Where a school is, as far as we could tell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub city: String,
    pub coords: Coords,
    pub address: String,
}

impl LocationRecord {
    /// The record stored when every query variant came back empty.
    pub fn unresolved() -> Self {
        Self {
            city: UNKNOWN_CITY.to_string(),
            coords: Coords::UNRESOLVED,
            address: UNKNOWN_ADDRESS.to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.coords.is_unresolved()
    }
}

/// Resolved record per distinct school for one run.
pub type SchoolLocations = BTreeMap<String, LocationRecord>;

/// Best match returned by a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    /// Full display address, comma separated, most specific part first.
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// Per-query knobs handed to the provider.
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// ISO 3166-1 alpha-2 country restriction (e.g. "cn").
    pub country: String,
    pub timeout: Duration,
    /// Preferred response language (Nominatim `accept-language`).
    pub language: String,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            country: "cn".into(),
            timeout: Duration::from_secs(10),
            language: "zh-CN".into(),
        }
    }
}

/// Provider failures. Always absorbed by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert!(Coords::UNRESOLVED.is_unresolved());
        assert!(!Coords(0.0, 121.5).is_unresolved());
        assert!(!LocationRecord::unresolved().is_resolved());
    }

    #[test]
    fn test_coords_as_array() {
        let rec = LocationRecord {
            city: "深圳市".into(),
            coords: Coords(22.53, 113.93),
            address: "南山区, 深圳市".into(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["coords"], serde_json::json!([22.53, 113.93]));
        assert_eq!(json["city"], "深圳市");
    }

    #[test]
    fn test_integer_coords_accepted() {
        let rec: LocationRecord =
            serde_json::from_str(r#"{"city":"未知","coords":[0,0],"address":"未知位置"}"#).unwrap();
        assert_eq!(rec, LocationRecord::unresolved());
    }
}
