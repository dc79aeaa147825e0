//! Summary spreadsheets as CSV (UTF-8 with BOM so spreadsheet apps pick the encoding).

use crate::error::{Error, Result};
use crate::location::types::UNKNOWN_CITY;
use crate::roster::{LocatedRow, Roster};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CITY_STATS_FILE: &str = "大学分布统计-城市分布.csv";
pub const SCHOOL_STATS_FILE: &str = "大学分布统计-学校分布.csv";
pub const RAW_DATA_FILE: &str = "大学分布统计-原始数据.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStat {
    #[serde(rename = "城市")]
    pub city: String,
    #[serde(rename = "人数")]
    pub count: usize,
    #[serde(rename = "学校列表")]
    pub schools: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolStat {
    #[serde(rename = "学校")]
    pub school: String,
    #[serde(rename = "人数")]
    pub count: usize,
    #[serde(rename = "城市")]
    pub city: String,
}

/// Paths of the three sheets written by [`write_stats`].
#[derive(Debug, Clone)]
pub struct StatsFiles {
    pub cities: PathBuf,
    pub schools: PathBuf,
    pub raw: PathBuf,
}

/// Headcount per known city, with the distinct schools seen there.
///
/// Ordered by headcount, descending; ties by first appearance.
pub fn city_stats(rows: &[LocatedRow<'_>]) -> Vec<CityStat> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (usize, Vec<&str>)> = HashMap::new();
    for r in rows.iter().filter(|r| r.city != UNKNOWN_CITY) {
        let entry = groups.entry(r.city).or_insert_with(|| {
            order.push(r.city);
            (0, Vec::new())
        });
        entry.0 += 1;
        if !entry.1.contains(&r.row.school.as_str()) {
            entry.1.push(&r.row.school);
        }
    }

    let mut stats: Vec<CityStat> = order
        .into_iter()
        .map(|city| {
            let (count, schools) = &groups[city];
            CityStat {
                city: city.to_string(),
                count: *count,
                schools: schools.join(", "),
            }
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Headcount per school, in first-appearance order.
pub fn school_stats(rows: &[LocatedRow<'_>]) -> Vec<SchoolStat> {
    let mut stats: Vec<SchoolStat> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in rows {
        match index.get(r.row.school.as_str()) {
            Some(&i) => stats[i].count += 1,
            None => {
                index.insert(&r.row.school, stats.len());
                stats.push(SchoolStat {
                    school: r.row.school.clone(),
                    count: 1,
                    city: r.city.to_string(),
                });
            }
        }
    }
    stats
}

fn bom_writer(path: &Path) -> Result<csv::Writer<File>> {
    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(UTF8_BOM).map_err(|e| Error::io(path, e))?;
    Ok(csv::Writer::from_writer(file))
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut wtr = bom_writer(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Input columns plus 城市 and 经纬度 for every row.
fn write_raw(path: &Path, roster: &Roster, rows: &[LocatedRow<'_>]) -> Result<()> {
    let mut wtr = bom_writer(path)?;
    let width = roster.headers().len();

    let mut header: Vec<&str> = roster.headers().iter().map(String::as_str).collect();
    header.extend(["城市", "经纬度"]);
    wtr.write_record(&header)?;

    for r in rows {
        let mut record: Vec<String> = r.row.fields.clone();
        record.resize(width, String::new());
        record.push(r.city.to_string());
        record.push(r.coords.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Write the city, school and raw-data sheets into `dir`.
pub fn write_stats(dir: &Path, roster: &Roster, rows: &[LocatedRow<'_>]) -> Result<StatsFiles> {
    let files = StatsFiles {
        cities: dir.join(CITY_STATS_FILE),
        schools: dir.join(SCHOOL_STATS_FILE),
        raw: dir.join(RAW_DATA_FILE),
    };
    write_records(&files.cities, &city_stats(rows))?;
    write_records(&files.schools, &school_stats(rows))?;
    write_raw(&files.raw, roster, rows)?;
    Ok(files)
}
