//! Common error types for tatl

use thiserror::Error;

/// Common result type for tatl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the tatl tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Flight-data provider failure (fatal to the run)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Reference table loading or shape error
    #[error("Reference table error: {0}")]
    Reference(String),

    /// Ledger read or write error
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}
