//! Reference tables
//!
//! Three read-only lookup tables loaded once at startup: airline codes
//! to display names, aircraft type codes to display names, and airport
//! codes to IATA code + country. All are headerless CSV files kept next
//! to the ledger; validation is column count only.

use std::collections::HashMap;
use std::path::Path;

use tatl_common::{Error, Result};

/// Airport reference entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportInfo {
    /// IATA code; None when the airport has no assignment
    pub iata: Option<String>,
    /// Country code (e.g. "US", "GB")
    pub country: String,
}

/// Read-only reference tables, loaded once per run.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    airlines: HashMap<String, String>,
    aircraft: HashMap<String, String>,
    airports: HashMap<String, AirportInfo>,
}

impl ReferenceTables {
    /// Load all three tables from disk.
    pub fn load(airlines: &Path, aircraft: &Path, airports: &Path) -> Result<Self> {
        let tables = Self {
            airlines: load_pairs(airlines)?,
            aircraft: load_pairs(aircraft)?,
            airports: load_airports(airports)?,
        };
        tracing::info!(
            airlines = tables.airlines.len(),
            aircraft = tables.aircraft.len(),
            airports = tables.airports.len(),
            "Reference tables loaded"
        );
        Ok(tables)
    }

    /// Build tables from already-materialized maps.
    pub fn from_maps(
        airlines: HashMap<String, String>,
        aircraft: HashMap<String, String>,
        airports: HashMap<String, AirportInfo>,
    ) -> Self {
        Self {
            airlines,
            aircraft,
            airports,
        }
    }

    pub fn airline_name(&self, code: &str) -> Option<&str> {
        self.airlines.get(code).map(String::as_str)
    }

    pub fn aircraft_name(&self, code: &str) -> Option<&str> {
        self.aircraft.get(code).map(String::as_str)
    }

    pub fn airport(&self, icao: &str) -> Option<&AirportInfo> {
        self.airports.get(icao)
    }
}

/// Load a two-column code → value table.
fn load_pairs(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = open_reader(path)?;
    let mut map = HashMap::new();

    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| Error::Reference(format!("{}: {}", path.display(), e)))?;
        if row.len() != 2 {
            return Err(column_count_error(path, index, 2, row.len()));
        }
        map.insert(row[0].to_string(), row[1].to_string());
    }

    Ok(map)
}

/// Load the three-column airport table (ICAO, IATA, country). An empty
/// IATA field means the airport has no assignment.
fn load_airports(path: &Path) -> Result<HashMap<String, AirportInfo>> {
    let mut reader = open_reader(path)?;
    let mut map = HashMap::new();

    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| Error::Reference(format!("{}: {}", path.display(), e)))?;
        if row.len() != 3 {
            return Err(column_count_error(path, index, 3, row.len()));
        }
        let iata = match &row[1] {
            "" => None,
            code => Some(code.to_string()),
        };
        map.insert(
            row[0].to_string(),
            AirportInfo {
                iata,
                country: row[2].to_string(),
            },
        );
    }

    Ok(map)
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Reference(format!("{}: {}", path.display(), e)))
}

fn column_count_error(path: &Path, index: usize, expected: usize, found: usize) -> Error {
    Error::Reference(format!(
        "{}: line {}: expected {} columns, found {}",
        path.display(),
        index + 1,
        expected,
        found
    ))
}
