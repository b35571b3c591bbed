//! Flight record data model
//!
//! Fixed-schema record types shared across the tatl tools. The ledger
//! CSV field names match the historical spreadsheet columns, so a ledger
//! file produced by earlier tooling keeps loading unchanged.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw arrival or departure as returned by the flight-data provider.
///
/// Never persisted directly; the normalizer turns it into a
/// [`FlightRecord`] or drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFlightRecord {
    /// Raw flight identifier, airline code glued to a flight number
    /// (e.g. "BAW123"); tail numbers and bare callsigns also appear
    pub ident: String,
    /// Actual arrival or departure time, epoch seconds
    pub timestamp: i64,
    /// ICAO aircraft type code (e.g. "B744")
    pub aircraft_type_code: String,
    /// ICAO origin airport code
    pub origin_code: String,
    /// ICAO destination airport code
    pub destination_code: String,
}

/// Coarse east/west classification of a flight.
///
/// East means the flight originates in the configured home country and
/// is heading out; everything else is westbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::East => "E",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized flight as persisted in the ledger.
///
/// `id` is the ledger primary key; no two persisted records share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    #[serde(rename = "ID")]
    pub id: String,

    /// Airport-local calendar date of the movement
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    /// Airline display name; None when the code had no mapping
    #[serde(rename = "Airline")]
    pub airline: Option<String>,

    /// Numeric flight number; empty when the ident carried none
    #[serde(rename = "Flight")]
    pub flight_number: String,

    /// Aircraft display name; never empty in a persisted record
    #[serde(rename = "Type")]
    pub aircraft_type: String,

    /// IATA code when mapped, otherwise the original ICAO code
    #[serde(rename = "Origin")]
    pub origin_iata: String,

    #[serde(rename = "Origin Country")]
    pub origin_country: String,

    #[serde(rename = "Destination")]
    pub destination_iata: String,

    #[serde(rename = "Destination Country")]
    pub destination_country: String,

    #[serde(rename = "Direction")]
    pub direction: Direction,
}
