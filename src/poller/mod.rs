pub mod extractor;
pub mod fetcher;
pub mod validator;

use crate::error::{Error, Result};
use crate::observability::metrics::{QUOTES_COLLECTED, SYMBOL_POLL_FAILURES};
use crate::observability::tracing::trace_symbol_poll;
use crate::snapshot::Snapshot;
use crate::types::price::Price;
use crate::types::quote::Quote;
use crate::types::symbol::Symbol;
use crate::poller::fetcher::QuoteFetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn, Instrument};

/// Fans fetch -> extract -> validate out across the captured symbol set and
/// fans the survivors back in as a sorted snapshot.
///
/// The worker pool is a semaphore created once at startup and reused across
/// cycles; each per-symbol unit holds one permit and runs under its own
/// timeout. A failing unit is logged, counted, and dropped; it never aborts
/// its siblings.
pub struct PollOrchestrator {
    fetcher: Arc<dyn QuoteFetcher>,
    currency_marker: String,
    limiter: Arc<Semaphore>,
    unit_timeout: Duration,
}

impl PollOrchestrator {
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        currency_marker: &str,
        worker_limit: usize,
        unit_timeout: Duration,
    ) -> Self {
        PollOrchestrator {
            fetcher,
            currency_marker: currency_marker.to_string(),
            limiter: Arc::new(Semaphore::new(worker_limit.max(1))),
            unit_timeout,
        }
    }

    /// Poll every symbol concurrently and return the snapshot of successful,
    /// validated quotes. Never fails as a whole: the worst case is an empty
    /// snapshot.
    pub async fn poll_all(&self, symbols: &[Symbol]) -> Snapshot {
        let mut units: JoinSet<Result<Quote>> = JoinSet::new();

        for symbol in symbols {
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = Arc::clone(&self.limiter);
            let marker = self.currency_marker.clone();
            let unit_timeout = self.unit_timeout;
            let symbol = symbol.clone();
            let span = trace_symbol_poll(&symbol);

            units.spawn(
                async move {
                    let _permit = limiter
                        .acquire_owned()
                        .await
                        .map_err(|_| Error::WorkerPanic("worker pool closed".to_string()))?;

                    match tokio::time::timeout(
                        unit_timeout,
                        poll_one(fetcher.as_ref(), &symbol, &marker),
                    )
                    .await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => Err(Error::FetchTimeout { symbol }),
                    }
                }
                .instrument(span),
            );
        }

        let mut snapshot = Snapshot::new();
        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(Ok(quote)) => {
                    QUOTES_COLLECTED.inc();
                    debug!("Collected quote {},{}", quote.symbol, quote.price);
                    snapshot.insert(quote);
                }
                Ok(Err(e)) => {
                    SYMBOL_POLL_FAILURES.inc();
                    if e.is_per_symbol() {
                        warn!("Symbol excluded from snapshot: {}", e);
                    } else {
                        error!("Poll unit failed: {}", e);
                    }
                }
                Err(e) => {
                    // A panicking unit costs one symbol, not the cycle.
                    SYMBOL_POLL_FAILURES.inc();
                    error!("Poll worker terminated abnormally: {}", e);
                }
            }
        }

        snapshot
    }
}

/// One isolated unit of work: fetch the page, extract the price candidate,
/// validate it, and wrap it as a quote.
async fn poll_one(fetcher: &dyn QuoteFetcher, symbol: &Symbol, currency_marker: &str) -> Result<Quote> {
    let payload = fetcher.fetch(symbol).await?;
    let candidate = extractor::extract(&payload, currency_marker)?;

    if !validator::validate(&candidate) {
        return Err(Error::ValidationError {
            symbol: symbol.clone(),
            value: candidate,
        });
    }

    Ok(Quote::new(symbol.clone(), Price::from_validated(candidate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Canned fetcher: serves a fixed payload per symbol, an error for
    /// unknown symbols, and hangs forever for symbols listed as slow.
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        slow: Vec<String>,
    }

    impl ScriptedFetcher {
        fn new(prices: &[(&str, &str)]) -> Self {
            let pages = prices
                .iter()
                .map(|(symbol, price)| (symbol.to_string(), quote_page(price)))
                .collect();
            ScriptedFetcher {
                pages,
                slow: Vec::new(),
            }
        }

        fn with_slow(mut self, symbol: &str) -> Self {
            self.slow.push(symbol.to_string());
            self
        }
    }

    #[async_trait]
    impl QuoteFetcher for ScriptedFetcher {
        async fn fetch(&self, symbol: &Symbol) -> Result<String> {
            if self.slow.contains(&symbol.to_string()) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.pages
                .get(symbol.as_str())
                .cloned()
                .ok_or_else(|| Error::FetchError {
                    symbol: symbol.clone(),
                    cause: "connection refused".to_string(),
                })
        }
    }

    /// Page whose 11th currency-marked fragment is `price` and also the
    /// shortest, matching the source page layout the extractor expects.
    fn quote_page(price: &str) -> String {
        let mut body = String::new();
        for i in 0..10 {
            body.push_str(&format!("<div>Market cap {i} $1,234,567,890.00</div>"));
        }
        body.push_str(&format!("<div>${price}</div>"));
        format!("<html><body>{body}</body></html>")
    }

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::parse(n).unwrap()).collect()
    }

    fn orchestrator(fetcher: ScriptedFetcher) -> PollOrchestrator {
        PollOrchestrator::new(Arc::new(fetcher), "$", 4, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn poll_all_builds_sorted_snapshot() {
        let fetcher = ScriptedFetcher::new(&[
            ("MSFT", "300.00"),
            ("AAPL", "150.00"),
            ("GOOG", "75.25"),
        ]);
        let snapshot = orchestrator(fetcher)
            .poll_all(&symbols(&["MSFT", "AAPL", "GOOG"]))
            .await;

        assert_eq!(snapshot.serialize(), "AAPL,150.00\nGOOG,75.25\nMSFT,300.00");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_symbol_is_excluded_without_aborting_others() {
        let fetcher = ScriptedFetcher::new(&[("AAPL", "150.00"), ("MSFT", "300.00")])
            .with_slow("SLOW");
        let snapshot = orchestrator(fetcher)
            .poll_all(&symbols(&["AAPL", "SLOW", "MSFT"]))
            .await;

        assert_eq!(snapshot.serialize(), "AAPL,150.00\nMSFT,300.00");
    }

    #[tokio::test]
    async fn fetch_failure_costs_only_that_symbol() {
        let fetcher = ScriptedFetcher::new(&[("AAPL", "150.00")]);
        let snapshot = orchestrator(fetcher)
            .poll_all(&symbols(&["AAPL", "DOWN"]))
            .await;

        assert_eq!(snapshot.serialize(), "AAPL,150.00");
    }

    #[tokio::test]
    async fn invalid_extracted_value_is_excluded() {
        // Page is well-formed but the price fragment is percentage text.
        let fetcher = ScriptedFetcher::new(&[("AAPL", "150.00"), ("PCT", "1.2%")]);
        let snapshot = orchestrator(fetcher)
            .poll_all(&symbols(&["AAPL", "PCT"]))
            .await;

        assert_eq!(snapshot.serialize(), "AAPL,150.00");
    }

    #[tokio::test]
    async fn empty_symbol_set_yields_empty_snapshot() {
        let fetcher = ScriptedFetcher::new(&[]);
        let snapshot = orchestrator(fetcher).poll_all(&[]).await;
        assert!(snapshot.is_empty());
    }
}
