use crate::types::price::Price;
use crate::types::quote::Quote;
use crate::types::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod store;

pub use store::SnapshotStore;

/// Sorted symbol -> price mapping from the most recent successful poll cycle.
///
/// Symbols that failed any pipeline stage this cycle are simply absent; the
/// snapshot never carries stale values forward. Iteration and serialization
/// order is always symbol-sorted regardless of worker completion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: BTreeMap<Symbol, Price>,
}

impl Snapshot {
    pub fn new() -> Self {
        Snapshot::default()
    }

    pub fn insert(&mut self, quote: Quote) {
        self.entries.insert(quote.symbol, quote.price);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&Price> {
        self.entries.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Price)> {
        self.entries.iter()
    }

    /// One `symbol,price` line per entry, `\n`-joined, no header and no
    /// trailing newline. This exact text is what gets persisted and what the
    /// change detector compares.
    pub fn serialize(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(symbol, price)| format!("{symbol},{price}"))
            .collect();
        lines.join("\n")
    }
}

impl FromIterator<Quote> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for quote in iter {
            snapshot.insert(quote);
        }
        snapshot
    }
}
