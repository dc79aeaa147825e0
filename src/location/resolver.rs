//! School resolver: cache first, then a ladder of provider queries.
//!
//! Flow:  Cache → "{name}大学, 中国" → "{name}, 中国" → "{name}大学" → "{name}" → unresolved
//!
//! Whatever comes out is written back into the cache, so an unresolvable school
//! is not queried again on the next run either.

use super::cache::LocationCache;
use super::providers::Geocoder;
use super::types::{Coords, GeoMatch, LocationRecord, LookupOptions, UNKNOWN_CITY};
use log::{debug, info, warn};

const CITY_MARKER: char = '市';
const DISTRICT_MARKER: char = '区';
const COUNTY_MARKER: char = '县';

/// Province-level prefixes stripped from the component holding the marker.
const PROVINCE_MARKERS: &[&str] = &["省", "自治区"];

/// Resolves school names to [`LocationRecord`]s.
pub struct SchoolResolver<G> {
    geocoder: G,
    options: LookupOptions,
}

impl<G: Geocoder> SchoolResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self::with_options(geocoder, LookupOptions::default())
    }

    pub fn with_options(geocoder: G, options: LookupOptions) -> Self {
        Self { geocoder, options }
    }

    /// Resolve one school, consulting and then updating `cache`.
    ///
    /// Cached records are returned as-is, never refreshed. Provider errors are
    /// logged and treated as "no match"; this never fails.
    pub fn resolve(&self, school: &str, cache: &mut LocationCache) -> LocationRecord {
        if let Some(hit) = cache.get(school) {
            debug!("Cache hit for {}", school);
            return hit.clone();
        }

        let record = match self.lookup(school) {
            Some(m) => {
                let (city, address) = city_and_address(&m.address);
                info!("Located {} -> {}", school, address);
                LocationRecord {
                    city,
                    coords: Coords(m.lat, m.lon),
                    address,
                }
            }
            None => {
                warn!("Could not locate {}", school);
                LocationRecord::unresolved()
            }
        };

        cache.insert(school, record.clone());
        record
    }

    /// First variant that yields a match wins.
    fn lookup(&self, school: &str) -> Option<GeoMatch> {
        query_variants(school)
            .iter()
            .find_map(|query| match self.geocoder.geocode(query, &self.options) {
                Ok(hit) => hit,
                Err(e) => {
                    warn!("Query '{}' for {} failed: {}", query, school, e);
                    None
                }
            })
    }
}

/// Queries tried for a school, most qualified first.
pub fn query_variants(school: &str) -> [String; 4] {
    [
        format!("{}大学, 中国", school),
        format!("{}, 中国", school),
        format!("{}大学", school),
        school.to_string(),
    ]
}

/// Derive `(city, address)` from a provider's full address string.
///
/// Marker precedence is 市, then 区, then 县. With no marker, the third-from-last
/// comma segment is used when there are at least three. If nothing applies the
/// city stays "未知" while the address stays the raw provider string.
pub fn city_and_address(full: &str) -> (String, String) {
    if let Some(idx) = full.find(CITY_MARKER) {
        let city = division_name(&full[..idx], CITY_MARKER);
        let rest = full[idx + CITY_MARKER.len_utf8()..].trim();
        let address = if rest.is_empty() {
            city.clone()
        } else {
            let first = rest.split(',').next().unwrap_or_default().trim();
            format!("{}, {}", first, city)
        };
        return (city, address);
    }

    for marker in [DISTRICT_MARKER, COUNTY_MARKER] {
        if let Some(idx) = full.find(marker) {
            let city = division_name(&full[..idx], marker);
            return (city.clone(), city);
        }
    }

    let parts: Vec<&str> = full.split(',').collect();
    if parts.len() > 2 {
        let city = parts[parts.len() - 3].trim().to_string();
        return (city.clone(), city);
    }

    (UNKNOWN_CITY.to_string(), full.to_string())
}

/// Name of the division ending at `marker`, given the text before it.
///
/// Only the comma component holding the marker counts, minus any province prefix:
/// "广东省深圳" + 市 → "深圳市".
fn division_name(before: &str, marker: char) -> String {
    let component = before.rsplit(',').next().unwrap_or_default().trim();
    let start = PROVINCE_MARKERS
        .iter()
        .filter_map(|p| component.rfind(p).map(|i| i + p.len()))
        .max()
        .unwrap_or(0);
    format!("{}{}", component[start..].trim(), marker)
}
