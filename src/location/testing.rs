//! Scripted geocoder for tests. Never touches the network.

use super::providers::Geocoder;
use super::types::{GeoMatch, GeocodeError, LookupOptions};
use std::cell::RefCell;
use std::collections::HashMap;

/// Answers from a fixed query → response table and records every query.
///
/// Queries missing from the table return `Ok(None)`.
#[derive(Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, Answer>,
    queries: RefCell<Vec<String>>,
}

enum Answer {
    Hit(GeoMatch),
    Fail,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(mut self, query: &str, address: &str, lat: f64, lon: f64) -> Self {
        let m = GeoMatch {
            address: address.to_string(),
            lat,
            lon,
        };
        self.answers.insert(query.to_string(), Answer::Hit(m));
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.answers.insert(query.to_string(), Answer::Fail);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl Geocoder for ScriptedGeocoder {
    fn geocode(&self, query: &str, _opts: &LookupOptions) -> Result<Option<GeoMatch>, GeocodeError> {
        self.queries.borrow_mut().push(query.to_string());
        match self.answers.get(query) {
            Some(Answer::Hit(m)) => Ok(Some(m.clone())),
            Some(Answer::Fail) => Err(GeocodeError::Network("timed out".into())),
            None => Ok(None),
        }
    }
}
