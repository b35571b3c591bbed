//! Flight identifier parsing and ledger id assignment
//!
//! A raw ident is an airline code glued to a flight number ("BAW123").
//! The split is at the first run of ASCII digits; idents with no digits
//! keep their full text as the airline code and carry no flight number.
//! Parsing never fails; degraded input degrades the output instead.

use chrono::NaiveDate;

/// A raw ident split into its airline and flight-number parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdent {
    /// Leading non-digit portion; empty for purely numeric idents
    pub airline_code: String,
    /// First digit run; None when the ident contains no digits
    pub flight_number: Option<String>,
}

/// Split a raw ident at the first run of digits.
pub fn split_ident(ident: &str) -> ParsedIdent {
    match ident.find(|c: char| c.is_ascii_digit()) {
        Some(start) => {
            let end = ident[start..]
                .find(|c: char| !c.is_ascii_digit())
                .map(|offset| start + offset)
                .unwrap_or(ident.len());
            ParsedIdent {
                airline_code: ident[..start].to_string(),
                flight_number: Some(ident[start..end].to_string()),
            }
        }
        None => ParsedIdent {
            airline_code: ident.to_string(),
            flight_number: None,
        },
    }
}

/// Derive the ledger id for a flight.
///
/// Date with separators stripped and the century dropped, then the raw
/// airline code, then the flight number (an absent number contributes
/// nothing). Two flights sharing date, airline and number collide; the
/// per-airport per-day volume keeps that acceptable.
pub fn flight_id(date: NaiveDate, airline_code: &str, flight_number: Option<&str>) -> String {
    format!(
        "{}{}{}",
        date.format("%y%m%d"),
        airline_code,
        flight_number.unwrap_or("")
    )
}
