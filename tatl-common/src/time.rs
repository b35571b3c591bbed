//! Timestamp utilities
//!
//! The provider reports movement times as epoch seconds; the ledger
//! records airport-local calendar dates. Conversions run through the
//! airport's IANA timezone from configuration.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{Error, Result};

/// Current time in the given timezone
pub fn now_local(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Convert epoch seconds to the airport-local calendar date.
///
/// Fails only when the epoch value is outside chrono's representable
/// range; callers treat that as degraded provider input.
pub fn local_date(epoch_secs: i64, tz: Tz) -> Result<NaiveDate> {
    let utc = DateTime::<Utc>::from_timestamp(epoch_secs, 0)
        .ok_or_else(|| Error::Provider(format!("timestamp out of range: {}", epoch_secs)))?;
    Ok(utc.with_timezone(&tz).date_naive())
}
