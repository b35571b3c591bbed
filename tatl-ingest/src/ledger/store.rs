//! Ledger persistence
//!
//! The ledger is one CSV file with a header row holding every flight
//! ever recorded. Reads load the whole table; writes replace the whole
//! file through a temporary sibling and a rename, so a failed run can
//! never leave a partially written ledger behind.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tatl_common::models::FlightRecord;
use tatl_common::{Error, Result};

/// In-memory snapshot of the persisted flight table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub records: Vec<FlightRecord>,
}

impl Ledger {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids currently present, for net-new computation.
    pub fn ids(&self) -> HashSet<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

/// Whole-table CSV persistence for the ledger.
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the full table. A missing file is an empty ledger (first
    /// run).
    pub fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No ledger file yet, starting empty");
            return Ok(Ledger::default());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: FlightRecord =
                row.map_err(|e| Error::Ledger(format!("{}: {}", self.path.display(), e)))?;
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), rows = records.len(), "Loaded ledger");
        Ok(Ledger { records })
    }

    /// Replace the table on disk.
    ///
    /// Serializes to a temporary sibling first and renames it over the
    /// target, so the write is all-or-nothing.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            for record in &ledger.records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        tracing::info!(path = %self.path.display(), rows = ledger.len(), "Ledger written");
        Ok(())
    }
}
