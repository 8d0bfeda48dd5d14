use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper-case ticker symbol, 1-6 ASCII alphanumeric characters.
///
/// Identity is the exact normalized string; ordering is plain string order so
/// sorted collections of symbols match the persisted registry order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

pub const MAX_SYMBOL_LEN: usize = 6;

impl Symbol {
    /// Parse a raw user-supplied string into a normalized symbol.
    ///
    /// Normalization is trim + ASCII uppercase, applied before any
    /// membership comparison.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() || normalized.len() > MAX_SYMBOL_LEN {
            return Err(Error::InvalidSymbol(raw.to_string()));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidSymbol(raw.to_string()));
        }

        Ok(Symbol(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
