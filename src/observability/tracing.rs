use crate::types::symbol::Symbol;
use tracing::Span;

pub fn trace_poll_cycle(cycle: u64) -> Span {
    tracing::info_span!(
        "poll_cycle",
        cycle,
    )
}

pub fn trace_symbol_poll(symbol: &Symbol) -> Span {
    tracing::info_span!(
        "symbol_poll",
        symbol = %symbol,
    )
}
