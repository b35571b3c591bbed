//! Run report output
//!
//! Human-readable status lines on stdout, preserving the historical
//! tool's shape: fetch timestamp, added/total counts, and a table of
//! the flights added this run. Diagnostics go to tracing, not here.

use chrono::DateTime;
use chrono_tz::Tz;

use tatl_common::models::FlightRecord;

use crate::pipeline::RunOutcome;

/// Print the fetch-timestamp header line.
pub fn print_header(fetched_at: &DateTime<Tz>) {
    println!(
        "Flights pulled from flight-data API query at {}.",
        fetched_at.format("%Y-%m-%d %H:%M:%S")
    );
}

/// Print the run outcome.
pub fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NothingToDo { .. } => {
            println!("No flights to add.");
        }
        RunOutcome::Added { added, total } => {
            println!("{} flights added. {} flights total", added.len(), total);
            println!();
            println!("Flight(s) Added:");
            println!();
            print!("{}", format_table(added));
        }
    }
}

/// Render the added-flights table: id, date, type, origin, destination.
fn format_table(records: &[FlightRecord]) -> String {
    let id_width = column_width("ID", records.iter().map(|r| r.id.len()));
    let type_width = column_width("Type", records.iter().map(|r| r.aircraft_type.len()));
    let origin_width = column_width("Origin", records.iter().map(|r| r.origin_iata.len()));

    let mut out = String::new();
    out.push_str(&format!(
        "{:<id_width$}  {:<10}  {:<type_width$}  {:<origin_width$}  {}\n",
        "ID", "Date", "Type", "Origin", "Destination"
    ));
    for record in records {
        out.push_str(&format!(
            "{:<id_width$}  {:<10}  {:<type_width$}  {:<origin_width$}  {}\n",
            record.id,
            record.date.to_string(),
            record.aircraft_type,
            record.origin_iata,
            record.destination_iata
        ));
    }
    out
}

fn column_width(header: &str, lengths: impl Iterator<Item = usize>) -> usize {
    lengths.chain(std::iter::once(header.len())).max().unwrap_or(0)
}
