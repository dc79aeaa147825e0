//! School location subsystem.
//!
//! Provides the persistent location cache, the geocoding provider seam and the
//! resolver that turns school names into coordinates plus a city label.

pub mod cache;
pub mod providers;
pub mod resolver;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::LocationCache;
pub use providers::{Geocoder, NominatimGeocoder};
pub use resolver::SchoolResolver;
pub use types::{Coords, GeoMatch, GeocodeError, LocationRecord, LookupOptions, SchoolLocations};
