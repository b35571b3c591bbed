//! Ledger merge engine
//!
//! Pure set semantics over the in-memory table: append the new batch,
//! stable-sort by date, deduplicate by id keeping the first occurrence,
//! and report which batch entries were genuinely new. Running the same
//! merge twice is a no-op.

use std::collections::HashSet;

use tatl_common::models::FlightRecord;

use super::store::Ledger;

/// Result of merging a batch into the ledger.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged table, sorted by date, ids unique
    pub ledger: Ledger,
    /// Batch entries whose id was not already persisted, in batch order
    pub net_new: Vec<FlightRecord>,
}

/// Merge newly normalized records into the existing table.
///
/// Ledger rows precede batch rows ahead of the stable sort, so when an
/// id collides the previously persisted row survives (keep-first
/// policy). Net-new entries are deduplicated within the batch the same
/// way, so the report matches what actually entered the ledger.
pub fn merge(ledger: Ledger, batch: Vec<FlightRecord>) -> MergeResult {
    let previously_seen = ledger.ids();

    let mut batch_seen = HashSet::new();
    let net_new: Vec<FlightRecord> = batch
        .iter()
        .filter(|r| !previously_seen.contains(&r.id) && batch_seen.insert(r.id.clone()))
        .cloned()
        .collect();

    let mut combined = ledger.records;
    combined.extend(batch);
    // Stable: same-date rows keep ledger-before-batch order
    combined.sort_by(|a, b| a.date.cmp(&b.date));

    let mut kept = HashSet::with_capacity(combined.len());
    combined.retain(|r| kept.insert(r.id.clone()));

    MergeResult {
        ledger: Ledger { records: combined },
        net_new,
    }
}
