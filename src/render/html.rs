//! Leaflet map page.

use crate::error::Result;
use crate::location::types::Coords;
use crate::map_data::MarkerRecord;
use askama::Template;
use chrono::Local;
use serde::Serialize;

pub const MAP_TITLE: &str = "同学蹭饭地图";
const INITIAL_ZOOM: u8 = 5;

#[derive(Template)]
#[template(path = "map.html", escape = "none")]
struct MapPage<'a> {
    title: &'a str,
    data_json: String,
    school_count: usize,
    student_count: usize,
    generated_at: String,
}

#[derive(Serialize)]
struct MapData<'a> {
    center: [f64; 2],
    zoom: u8,
    markers: &'a [MarkerRecord],
}

/// Render the self-contained map page.
pub fn render_map(center: Coords, markers: &[MarkerRecord]) -> Result<String> {
    let data = MapData {
        center: [center.lat(), center.lng()],
        zoom: INITIAL_ZOOM,
        markers,
    };
    let page = MapPage {
        title: MAP_TITLE,
        data_json: script_safe_json(&data)?,
        school_count: markers.len(),
        student_count: markers.iter().map(|m| m.students.len()).sum(),
        generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
    };
    Ok(page.render()?)
}

/// JSON that can sit inside a `<script>` element.
///
/// Every `<` is emitted as `\u003c`, so names can neither close the element
/// nor open a `<!--` comment state. `<` only ever occurs inside JSON strings.
fn script_safe_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}
