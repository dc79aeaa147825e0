//! Input roster: one row per person, read from a UTF-8 CSV file.

use crate::error::{Error, Result};
use crate::location::types::{Coords, SchoolLocations, UNKNOWN_CITY};
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;

pub const NAME_COLUMN: &str = "姓名";
pub const SCHOOL_COLUMN: &str = "学校";

/// One input row. `fields` keeps every original cell for the raw-data sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub school: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    headers: Vec<String>,
    rows: Vec<Row>,
}

/// A row joined with its school's resolved location.
#[derive(Debug, Clone, Copy)]
pub struct LocatedRow<'a> {
    pub row: &'a Row,
    pub city: &'a str,
    pub coords: Coords,
}

impl Roster {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let roster = Self::from_reader(file)?;
        info!("Read {} rows from {}", roster.len(), path.display());
        Ok(roster)
    }

    /// Parse CSV with a header row that must contain 姓名 and 学校.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        let name_idx = column(NAME_COLUMN)?;
        let school_idx = column(SCHOOL_COLUMN)?;

        let mut rows = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let school = record.get(school_idx).unwrap_or_default();
            if school.is_empty() {
                // +2: header line plus 1-based numbering
                warn!("Skipping row {}: empty {}", line + 2, SCHOOL_COLUMN);
                continue;
            }
            rows.push(Row {
                name: record.get(name_idx).unwrap_or_default().to_string(),
                school: school.to_string(),
                fields: record.iter().map(str::to_string).collect(),
            });
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct school names in order of first appearance.
    pub fn schools(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.school.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Attach each row's city and coordinates.
    pub fn locate<'a>(&'a self, locations: &'a SchoolLocations) -> Vec<LocatedRow<'a>> {
        self.rows
            .iter()
            .map(|row| match locations.get(&row.school) {
                Some(loc) => LocatedRow {
                    row,
                    city: &loc.city,
                    coords: loc.coords,
                },
                None => LocatedRow {
                    row,
                    city: UNKNOWN_CITY,
                    coords: Coords::UNRESOLVED,
                },
            })
            .collect()
    }
}
