//! Shared types for the tatl flight-ledger tools
//!
//! Holds the pieces every tatl binary needs: the common error type, the
//! TOML configuration, timestamp helpers, and the flight record model.

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
