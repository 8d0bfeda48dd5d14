use crate::types::symbol::Symbol;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Fetch Errors
    #[error("Fetch failed for {symbol}: {cause}")]
    FetchError { symbol: Symbol, cause: String },

    #[error("Fetch timed out for {symbol}")]
    FetchTimeout { symbol: Symbol },

    #[error("Non-success status {status} for {symbol}")]
    FetchStatus { symbol: Symbol, status: u16 },

    // Extraction Errors
    #[error("Extraction failed: {0}")]
    ExtractError(ExtractFailure),

    // Validation Errors
    #[error("Invalid price value {value:?} for {symbol}")]
    ValidationError { symbol: Symbol, value: String },

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    // Persistence Errors
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    // Notification Errors
    #[error("Update notification failed: {0}")]
    NotifyError(String),

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle worker terminated: {0}")]
    WorkerPanic(String),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractFailure {
    InsufficientMatches { found: usize },
    CrossCheckMismatch { selected: String, shortest: String },
}

impl std::fmt::Display for ExtractFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractFailure::InsufficientMatches { found } => {
                write!(f, "insufficient matches: found {found}")
            }
            ExtractFailure::CrossCheckMismatch { selected, shortest } => {
                write!(f, "cross-check mismatch: selected {selected:?}, shortest {shortest:?}")
            }
        }
    }
}

impl Error {
    /// True for per-symbol failures that exclude one symbol from the snapshot
    /// without affecting the rest of the cycle.
    pub fn is_per_symbol(&self) -> bool {
        matches!(
            self,
            Error::FetchError { .. }
                | Error::FetchTimeout { .. }
                | Error::FetchStatus { .. }
                | Error::ExtractError(_)
                | Error::ValidationError { .. }
        )
    }
}
