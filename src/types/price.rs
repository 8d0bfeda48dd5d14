use serde::{Deserialize, Serialize};
use std::fmt;

/// A quoted price kept as the exact decimal string scraped from the source,
/// always with two fractional digits (e.g. "193.42").
///
/// Prices never round-trip through floating point: the persisted snapshot must
/// reproduce the scraped text byte for byte, and the change detector compares
/// raw text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price(String);

impl Price {
    /// Wrap an already-validated price string. Callers are expected to run
    /// the value through `poller::validator::validate` first.
    pub fn from_validated(value: String) -> Self {
        Price(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
