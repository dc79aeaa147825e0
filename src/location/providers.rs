//! Geocoding providers.

use super::types::{GeoMatch, GeocodeError, LookupOptions};
use serde::Deserialize;

/// Public OpenStreetMap Nominatim search endpoint.
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// A free-text geocoder returning at most one best match.
///
/// `Ok(None)` means the provider answered but found nothing.
pub trait Geocoder {
    fn geocode(&self, query: &str, opts: &LookupOptions) -> Result<Option<GeoMatch>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, query: &str, opts: &LookupOptions) -> Result<Option<GeoMatch>, GeocodeError> {
        (**self).geocode(query, opts)
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<NominatimResult> for GeoMatch {
    type Error = GeocodeError;

    fn try_from(r: NominatimResult) -> Result<Self, Self::Error> {
        let lat = r
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", r.lat)))?;
        let lon = r
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", r.lon)))?;
        Ok(GeoMatch {
            address: r.display_name,
            lat,
            lon,
        })
    }
}

/// OpenStreetMap Nominatim over blocking HTTP.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_endpoint(NOMINATIM_SEARCH_URL, user_agent)
    }

    /// Point at a self-hosted or mirror instance.
    pub fn with_endpoint(endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str, opts: &LookupOptions) -> Result<Option<GeoMatch>, GeocodeError> {
        let mut request = ureq::get(&self.endpoint)
            .set("User-Agent", &self.user_agent)
            .timeout(opts.timeout)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1");
        if !opts.country.is_empty() {
            request = request.query("countrycodes", &opts.country);
        }
        if !opts.language.is_empty() {
            request = request.query("accept-language", &opts.language);
        }

        let response = request
            .call()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let body = response
            .into_string()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        parse_search_response(&body)
    }
}

/// Take the first hit of a Nominatim `format=json` search response.
fn parse_search_response(body: &str) -> Result<Option<GeoMatch>, GeocodeError> {
    let results: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
    results.into_iter().next().map(GeoMatch::try_from).transpose()
}
