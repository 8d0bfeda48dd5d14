use crate::types::price::Price;
use crate::types::symbol::Symbol;
use serde::{Deserialize, Serialize};

/// One validated reading for one symbol, produced by a poll unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub price: Price,
}

impl Quote {
    pub fn new(symbol: Symbol, price: Price) -> Self {
        Quote { symbol, price }
    }
}
