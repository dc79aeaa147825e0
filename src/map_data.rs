//! Shapes roster rows and resolved locations into map markers.

use crate::location::types::{Coords, LocationRecord, SchoolLocations};
use crate::roster::Row;
use serde::Serialize;
use std::collections::HashMap;

/// Rough geographic centre of China, used when nothing resolved.
pub const FALLBACK_CENTER: Coords = Coords(35.8617, 104.1954);

/// One map pin per school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRecord {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub students: Vec<String>,
    pub address: String,
}

/// Group `rows` by school into markers, in order of first appearance.
///
/// Students keep their input order. Unresolved schools keep the `(0, 0)` sentinel.
pub fn build_markers(rows: &[Row], locations: &SchoolLocations) -> Vec<MarkerRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<String>> = HashMap::new();
    for row in rows {
        groups
            .entry(row.school.as_str())
            .or_insert_with(|| {
                order.push(row.school.as_str());
                Vec::new()
            })
            .push(row.name.clone());
    }

    let unresolved = LocationRecord::unresolved();
    order
        .into_iter()
        .map(|school| {
            let loc = locations.get(school).unwrap_or(&unresolved);
            MarkerRecord {
                lat: loc.coords.lat(),
                lng: loc.coords.lng(),
                title: school.to_string(),
                students: groups.remove(school).unwrap_or_default(),
                address: loc.address.clone(),
            }
        })
        .collect()
}

/// Mean of every resolved coordinate, or [`FALLBACK_CENTER`] if there are none.
pub fn compute_center<'a>(locations: impl IntoIterator<Item = &'a LocationRecord>) -> Coords {
    let (count, lat, lng) = locations
        .into_iter()
        .map(|loc| loc.coords)
        .filter(|c| !c.is_unresolved())
        .fold((0usize, 0.0, 0.0), |(n, lat, lng), c| (n + 1, lat + c.lat(), lng + c.lng()));

    if count == 0 {
        return FALLBACK_CENTER;
    }
    Coords(lat / count as f64, lng / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(name: &str, school: &str) -> Row {
        Row {
            name: name.into(),
            school: school.into(),
            fields: vec![name.into(), school.into()],
        }
    }

    fn at(lat: f64, lng: f64) -> LocationRecord {
        LocationRecord {
            city: "某市".into(),
            coords: Coords(lat, lng),
            address: "某地".into(),
        }
    }

    #[test]
    fn test_markers_grouped_in_order() {
        let rows = vec![
            row("张三", "清华"),
            row("李四", "北大"),
            row("王五", "清华"),
            row("赵六", "复旦"),
            row("钱七", "北大"),
        ];
        let mut locations = SchoolLocations::new();
        locations.insert("清华".into(), at(40.0, 116.3));
        locations.insert("北大".into(), at(39.99, 116.31));
        locations.insert("复旦".into(), LocationRecord::unresolved());

        let markers = build_markers(&rows, &locations);
        assert_eq!(markers.len(), 3);
        let titles: Vec<&str> = markers.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["清华", "北大", "复旦"]);
        assert_eq!(markers[0].students, vec!["张三", "王五"]);
        assert_eq!(markers[1].students, vec!["李四", "钱七"]);
        assert_eq!(markers[0].lat, 40.0);
        assert_eq!(markers[0].lng, 116.3);
        assert_eq!(markers[0].address, "某地");

        assert_eq!(markers[2].lat, 0.0);
        assert_eq!(markers[2].lng, 0.0);
        assert_eq!(markers[2].address, "未知位置");
    }

    #[test]
    fn test_markers_missing_location_is_unresolved() {
        let markers = build_markers(&[row("张三", "无名")], &SchoolLocations::new());
        assert_eq!(markers[0].address, "未知位置");
        assert_eq!((markers[0].lat, markers[0].lng), (0.0, 0.0));
    }

    #[test]
    fn test_marker_json_shape() {
        let markers = build_markers(&[row("张三", "清华")], &{
            let mut l = SchoolLocations::new();
            l.insert("清华".into(), at(40.0, 116.3));
            l
        });
        let json = serde_json::to_value(&markers[0]).unwrap();
        assert_eq!(json["lat"], 40.0);
        assert_eq!(json["lng"], 116.3);
        assert_eq!(json["title"], "清华");
        assert_eq!(json["students"], serde_json::json!(["张三"]));
    }

    #[test]
    fn test_center_skips_sentinel() {
        let locs = vec![
            at(0.0, 0.0),
            at(31.2, 121.5),
            LocationRecord::unresolved(),
            at(39.9, 116.4),
        ];
        let center = compute_center(&locs);
        assert_relative_eq!(center.lat(), 35.55, epsilon = 1e-9);
        assert_relative_eq!(center.lng(), 118.95, epsilon = 1e-9);
    }

    #[test]
    fn test_center_keeps_zero_latitude_with_nonzero_longitude() {
        let center = compute_center(&[at(0.0, 100.0), at(10.0, 110.0)]);
        assert_relative_eq!(center.lat(), 5.0);
        assert_relative_eq!(center.lng(), 105.0);
    }

    #[test]
    fn test_center_fallback() {
        assert_eq!(compute_center(&[LocationRecord::unresolved()]), FALLBACK_CENTER);
        assert_eq!(compute_center(&Vec::<LocationRecord>::new()), FALLBACK_CENTER);
    }
}
