//! The ingest run pipeline
//!
//! One parameterized pipeline: fetch → normalize → filter → assign ids →
//! merge → persist. The zero-new-records path is a first-class outcome
//! that performs no ledger write; provider or ledger I/O failure aborts
//! the run before anything is written.

use chrono_tz::Tz;

use tatl_common::config::Config;
use tatl_common::models::{FlightRecord, RawFlightRecord};
use tatl_common::{Error, Result};

use crate::ident;
use crate::ledger::merge::merge;
use crate::ledger::store::LedgerStore;
use crate::services::filter::FilterPipeline;
use crate::services::normalize::{Candidate, Normalizer};
use crate::services::provider::FlightDataClient;
use crate::services::reference::ReferenceTables;

/// What a run accomplished.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every fetched flight was already in the ledger; nothing was
    /// written. The expected steady state between flight events.
    NothingToDo {
        /// Ledger size, unchanged
        total: usize,
    },
    /// New flights were persisted.
    Added {
        /// The net-new records, in batch order
        added: Vec<FlightRecord>,
        /// Ledger size after the merge
        total: usize,
    },
}

/// The assembled ingest pipeline for one airport.
pub struct IngestPipeline {
    config: Config,
    tz: Tz,
    tables: ReferenceTables,
    client: FlightDataClient,
    store: LedgerStore,
}

impl IngestPipeline {
    /// Assemble the pipeline from configuration: load the reference
    /// tables, resolve credentials, build the provider client.
    pub fn from_config(config: Config) -> Result<Self> {
        let tz = config.tz()?;
        let tables = ReferenceTables::load(
            &config.data.airlines,
            &config.data.aircraft,
            &config.data.airports,
        )?;
        let (user, key) = config.credentials()?;
        let client =
            FlightDataClient::new(&config.base_url, &config.airport, config.how_many, user, key)
                .map_err(|e| Error::Provider(e.to_string()))?;
        let store = LedgerStore::new(&config.data.ledger);

        Ok(Self {
            config,
            tz,
            tables,
            client,
            store,
        })
    }

    /// Execute one run.
    pub async fn run(&self) -> Result<RunOutcome> {
        let arrived = self
            .client
            .fetch_arrived()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;
        let departed = self
            .client
            .fetch_departed()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;
        tracing::info!(
            arrived = arrived.len(),
            departed = departed.len(),
            "Fetched provider records"
        );

        let batch = self.build_batch(arrived.into_iter().chain(departed));

        let ledger = self.store.load()?;
        let before = ledger.len();
        let result = merge(ledger, batch);

        if result.net_new.is_empty() {
            tracing::info!(total = before, "No new flights");
            return Ok(RunOutcome::NothingToDo { total: before });
        }

        self.store.save(&result.ledger)?;
        tracing::info!(
            added = result.net_new.len(),
            total = result.ledger.len(),
            "Ledger updated"
        );

        Ok(RunOutcome::Added {
            added: result.net_new,
            total: result.ledger.len(),
        })
    }

    /// Normalize, filter and assign ids to one fetch worth of records.
    fn build_batch(&self, raw: impl Iterator<Item = RawFlightRecord>) -> Vec<FlightRecord> {
        let normalizer = Normalizer::new(
            &self.tables,
            self.tz,
            self.config.home_country.clone(),
            self.config.aircraft_overrides.clone(),
        );
        let filters = FilterPipeline::new(self.config.filters.clone());

        let mut candidates = Vec::new();
        for record in raw {
            match normalizer.normalize(&record) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    tracing::warn!(ident = %record.ident, error = %e, "Skipping unnormalizable record");
                }
            }
        }

        let (kept, dropped) = filters.apply(candidates);
        tracing::info!(kept = kept.len(), dropped = dropped.len(), "Filter pipeline applied");

        kept.into_iter().filter_map(finalize).collect()
    }
}

/// Candidate → ledger record. The filter pipeline guarantees the
/// aircraft type resolved; a missing one here is a bug, not data.
fn finalize(candidate: Candidate) -> Option<FlightRecord> {
    let aircraft_type = match candidate.aircraft_type {
        Some(aircraft_type) => aircraft_type,
        None => {
            tracing::error!(
                airline_code = %candidate.airline_code,
                "Candidate lost its aircraft type after filtering"
            );
            return None;
        }
    };

    let id = ident::flight_id(
        candidate.date,
        &candidate.airline_code,
        candidate.flight_number.as_deref(),
    );

    Some(FlightRecord {
        id,
        date: candidate.date,
        airline: candidate.airline,
        flight_number: candidate.flight_number.unwrap_or_default(),
        aircraft_type,
        origin_iata: candidate.origin_iata,
        origin_country: candidate.origin_country,
        destination_iata: candidate.destination_iata,
        destination_country: candidate.destination_country,
        direction: candidate.direction,
    })
}
