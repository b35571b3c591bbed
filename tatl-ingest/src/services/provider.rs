//! Flight-data provider client
//!
//! Talks to a FlightXML2-shaped API: two read operations (Arrived,
//! Departed) parameterized by airport and result cap, authenticated with
//! an HTTP basic user/key pair. The provider reports some faults inside
//! an HTTP 200 body carrying a top-level "error" key, so success
//! decoding goes through a JSON value first.
//!
//! Failures here are fatal to the run; there is no retry policy.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use tatl_common::models::RawFlightRecord;

const USER_AGENT: &str = concat!("tatl/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider client errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Provider fault: {0}")]
    Fault(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct ArrivedEnvelope {
    #[serde(rename = "ArrivedResult")]
    result: ArrivedResult,
}

#[derive(Debug, Deserialize)]
struct ArrivedResult {
    arrivals: Vec<WireFlight>,
}

#[derive(Debug, Deserialize)]
struct DepartedEnvelope {
    #[serde(rename = "DepartedResult")]
    result: DepartedResult,
}

#[derive(Debug, Deserialize)]
struct DepartedResult {
    departures: Vec<WireFlight>,
}

/// Wire entry shared by both endpoints. Each endpoint fills in its own
/// actual-time field; the other may be absent or null.
#[derive(Debug, Deserialize)]
struct WireFlight {
    ident: String,
    #[serde(rename = "aircrafttype", default)]
    aircraft_type: String,
    origin: String,
    destination: String,
    #[serde(rename = "actualarrivaltime", default)]
    actual_arrival_time: Option<i64>,
    #[serde(rename = "actualdeparturetime", default)]
    actual_departure_time: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
enum TimeField {
    Arrival,
    Departure,
}

/// Client for the flight-data provider.
pub struct FlightDataClient {
    http: reqwest::Client,
    base_url: String,
    airport: String,
    how_many: u32,
    user: String,
    key: String,
}

impl FlightDataClient {
    pub fn new(
        base_url: &str,
        airport: &str,
        how_many: u32,
        user: String,
        key: String,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            airport: airport.to_string(),
            how_many,
            user,
            key,
        })
    }

    /// Fetch the latest arrivals at the configured airport.
    pub async fn fetch_arrived(&self) -> Result<Vec<RawFlightRecord>, ProviderError> {
        let value = self.get_endpoint("Arrived").await?;
        let envelope: ArrivedEnvelope = serde_json::from_value(value)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(collect(envelope.result.arrivals, TimeField::Arrival))
    }

    /// Fetch the latest departures from the configured airport.
    pub async fn fetch_departed(&self) -> Result<Vec<RawFlightRecord>, ProviderError> {
        let value = self.get_endpoint("Departed").await?;
        let envelope: DepartedEnvelope = serde_json::from_value(value)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(collect(envelope.result.departures, TimeField::Departure))
    }

    async fn get_endpoint(&self, endpoint: &str) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let how_many = self.how_many.to_string();

        tracing::debug!(url = %url, airport = %self.airport, "Querying flight-data provider");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("airport", self.airport.as_str()),
                ("howMany", how_many.as_str()),
            ])
            .basic_auth(&self.user, Some(&self.key))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), body));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        // The provider signals NO_DATA and auth problems inside a 200.
        if let Some(fault) = value.get("error").and_then(|v| v.as_str()) {
            return Err(ProviderError::Fault(fault.to_string()));
        }

        Ok(value)
    }
}

/// Map wire entries into raw records, taking the timestamp from the
/// endpoint's own actual-time field. Entries without one are degraded
/// input and are skipped, not fatal.
fn collect(entries: Vec<WireFlight>, field: TimeField) -> Vec<RawFlightRecord> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let timestamp = match field {
                TimeField::Arrival => entry.actual_arrival_time,
                TimeField::Departure => entry.actual_departure_time,
            };
            match timestamp {
                Some(timestamp) => Some(RawFlightRecord {
                    ident: entry.ident,
                    timestamp,
                    aircraft_type_code: entry.aircraft_type,
                    origin_code: entry.origin,
                    destination_code: entry.destination,
                }),
                None => {
                    tracing::warn!(ident = %entry.ident, "Entry missing its actual time, skipped");
                    None
                }
            }
        })
        .collect()
}
