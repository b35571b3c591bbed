//! Record normalization
//!
//! Turns one raw provider record plus the reference tables into a
//! [`Candidate`] carrying every ledger field. Lookup misses degrade per
//! field: a missing airline stays None, a missing aircraft type stays
//! None for the filter pipeline to drop, and an unknown airport keeps
//! its ICAO code with an empty country.

use chrono::NaiveDate;
use chrono_tz::Tz;

use tatl_common::config::AircraftOverride;
use tatl_common::models::{Direction, RawFlightRecord};
use tatl_common::{time, Result};

use crate::ident::{self, ParsedIdent};
use crate::services::reference::ReferenceTables;

/// A normalized record before filtering.
///
/// Field layout matches the ledger record except that aircraft
/// resolution may still be missing and the raw ICAO codes are retained
/// for the filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub date: NaiveDate,
    /// Raw parsed airline code, pre-name-resolution; feeds the id
    pub airline_code: String,
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub aircraft_type: Option<String>,
    pub origin_code: String,
    pub origin_iata: String,
    pub origin_country: String,
    pub destination_code: String,
    pub destination_iata: String,
    pub destination_country: String,
    pub direction: Direction,
}

/// Normalizes raw records against the reference tables.
pub struct Normalizer<'a> {
    tables: &'a ReferenceTables,
    tz: Tz,
    home_country: String,
    overrides: Vec<AircraftOverride>,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        tables: &'a ReferenceTables,
        tz: Tz,
        home_country: String,
        overrides: Vec<AircraftOverride>,
    ) -> Self {
        Self {
            tables,
            tz,
            home_country,
            overrides,
        }
    }

    /// Normalize one raw record.
    ///
    /// Fails only on an unrepresentable timestamp; the caller drops the
    /// record and the run continues.
    pub fn normalize(&self, raw: &RawFlightRecord) -> Result<Candidate> {
        let date = time::local_date(raw.timestamp, self.tz)?;

        let ParsedIdent {
            airline_code,
            flight_number,
        } = ident::split_ident(&raw.ident);

        let airline = self
            .tables
            .airline_name(&airline_code)
            .map(str::to_string);
        let aircraft_type = self.resolve_aircraft(&raw.aircraft_type_code, airline.as_deref());

        let (origin_iata, origin_country) = self.resolve_airport(&raw.origin_code);
        let (destination_iata, destination_country) = self.resolve_airport(&raw.destination_code);

        let direction = if origin_country == self.home_country {
            Direction::East
        } else {
            Direction::West
        };

        Ok(Candidate {
            date,
            airline_code,
            airline,
            flight_number,
            aircraft_type,
            origin_code: raw.origin_code.clone(),
            origin_iata,
            origin_country,
            destination_code: raw.destination_code.clone(),
            destination_iata,
            destination_country,
            direction,
        })
    }

    /// Airline-name overrides win over the table lookup, whatever the
    /// raw code said.
    fn resolve_aircraft(&self, code: &str, airline: Option<&str>) -> Option<String> {
        if let Some(airline) = airline {
            if let Some(forced) = self.overrides.iter().find(|o| o.airline == airline) {
                return Some(forced.aircraft_type.clone());
            }
        }
        self.tables.aircraft_name(code).map(str::to_string)
    }

    /// IATA code when mapped, otherwise the ICAO code unchanged. The
    /// country comes from the same entry; an unknown airport resolves
    /// to an empty country.
    fn resolve_airport(&self, icao: &str) -> (String, String) {
        match self.tables.airport(icao) {
            Some(info) => (
                info.iata.clone().unwrap_or_else(|| icao.to_string()),
                info.country.clone(),
            ),
            None => {
                tracing::debug!(code = %icao, "Airport code missing from reference table");
                (icao.to_string(), String::new())
            }
        }
    }
}
