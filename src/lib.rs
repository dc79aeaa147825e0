//! Classmate map generator.
//!
//! Reads a roster of people and their schools, geocodes each school once
//! (results are cached next to the outputs) and renders a Leaflet map, a
//! word cloud and summary sheets.

pub mod config;
pub mod error;
pub mod location;
pub mod map_data;
pub mod pipeline;
pub mod render;
pub mod roster;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use pipeline::{run, RunSummary};
