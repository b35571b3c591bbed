//! Transatlantic relevance filters
//!
//! Ordered, independent predicates over normalized candidates. A record
//! survives only if every predicate passes; the first failure names the
//! reason so dropped records stay diagnosable in the logs.

use std::fmt;

use tatl_common::config::FilterConfig;

use crate::services::normalize::Candidate;

/// Why a candidate was excluded from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Origin or destination is not a plausible 4-character ICAO code
    MalformedCode,
    /// Both legs are inside the domestic-or-near-domestic region
    DomesticRoute,
    /// Aircraft type did not resolve and no override applied
    AircraftUnresolved,
    /// Matches a configured non-passenger calling pattern
    ExcludedPattern,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::MalformedCode => "malformed airport code",
            RejectReason::DomesticRoute => "domestic-only route",
            RejectReason::AircraftUnresolved => "unresolved aircraft type",
            RejectReason::ExcludedPattern => "excluded flight pattern",
        };
        f.write_str(text)
    }
}

/// The ordered filter pipeline.
pub struct FilterPipeline {
    policy: FilterConfig,
}

impl FilterPipeline {
    pub fn new(policy: FilterConfig) -> Self {
        Self { policy }
    }

    /// Evaluate every predicate in order; None means the candidate
    /// survives.
    pub fn evaluate(&self, candidate: &Candidate) -> Option<RejectReason> {
        if !valid_code_shape(&candidate.origin_code)
            || !valid_code_shape(&candidate.destination_code)
        {
            return Some(RejectReason::MalformedCode);
        }
        if self.is_domestic_or_near(&candidate.origin_code)
            && self.is_domestic_or_near(&candidate.destination_code)
        {
            return Some(RejectReason::DomesticRoute);
        }
        if candidate.aircraft_type.is_none() {
            return Some(RejectReason::AircraftUnresolved);
        }
        if self.is_excluded_pattern(candidate) {
            return Some(RejectReason::ExcludedPattern);
        }
        None
    }

    /// Split a batch into survivors and rejections, logging each drop.
    pub fn apply(&self, batch: Vec<Candidate>) -> (Vec<Candidate>, Vec<(Candidate, RejectReason)>) {
        let mut kept = Vec::with_capacity(batch.len());
        let mut dropped = Vec::new();

        for candidate in batch {
            match self.evaluate(&candidate) {
                None => kept.push(candidate),
                Some(reason) => {
                    tracing::debug!(
                        origin = %candidate.origin_code,
                        destination = %candidate.destination_code,
                        airline = %candidate.airline_code,
                        %reason,
                        "Dropped candidate"
                    );
                    dropped.push((candidate, reason));
                }
            }
        }

        (kept, dropped)
    }

    /// Domestic-or-near-domestic heuristic: the configured ICAO
    /// prefixes, plus degenerate codes whose second character is a
    /// space, which never count as foreign. An allow-list, not
    /// exhaustive; the rare miss is handled ad hoc downstream.
    fn is_domestic_or_near(&self, code: &str) -> bool {
        if code.chars().nth(1) == Some(' ') {
            return true;
        }
        self.policy
            .domestic_prefixes
            .iter()
            .any(|prefix| code.starts_with(prefix.as_str()))
    }

    fn is_excluded_pattern(&self, candidate: &Candidate) -> bool {
        let Some(flight) = candidate.flight_number.as_deref() else {
            return false;
        };
        self.policy
            .excluded_flights
            .iter()
            .any(|x| x.airline == candidate.airline_code && x.flight == flight)
    }
}

/// Exactly 4 characters, neither starting nor ending with a digit.
/// Screens out feed artifacts like "46ME" or "ME33".
fn valid_code_shape(code: &str) -> bool {
    let chars: Vec<char> = code.chars().collect();
    chars.len() == 4 && !chars[0].is_ascii_digit() && !chars[3].is_ascii_digit()
}
