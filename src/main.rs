use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use stockwatch::config::AppConfig;
use stockwatch::notifier::{ChangeNotifier, HttpUpdateSink};
use stockwatch::observability;
use stockwatch::poller::fetcher::HttpQuoteFetcher;
use stockwatch::poller::PollOrchestrator;
use stockwatch::registry::SymbolRegistry;
use stockwatch::scheduler::{PollerState, Scheduler};
use stockwatch::snapshot::SnapshotStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_tracing();
    observability::metrics::register_metrics();

    let env = std::env::var("STOCKWATCH_ENV").unwrap_or_else(|_| "default".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    // The registry path is the one thing the pipeline cannot run without;
    // everything downstream degrades per cycle instead.
    let registry = Arc::new(
        SymbolRegistry::load(&config.storage.registry_path)
            .context("loading symbol registry")?,
    );
    let store = SnapshotStore::new(&config.storage.snapshot_path);
    let state = PollerState::new(Arc::clone(&registry), store);

    let fetcher = Arc::new(
        HttpQuoteFetcher::new(&config.source.base_url, config.source.request_timeout())
            .context("building quote fetcher")?,
    );
    // Unit timeout backstops the whole fetch+extract+validate unit; the HTTP
    // client timeout is the real per-request bound.
    let unit_timeout = config.source.request_timeout() + Duration::from_secs(1);
    let orchestrator = PollOrchestrator::new(
        fetcher,
        &config.source.currency_marker,
        config.poll.worker_limit(),
        unit_timeout,
    );

    let sink = HttpUpdateSink::new(&config.notify.update_url, config.source.request_timeout())
        .context("building update sink")?;
    let notifier = ChangeNotifier::new(Box::new(sink));

    let scheduler = Scheduler::new(orchestrator, notifier, config.poll.interval());

    // Surface registry mutations (made by the display service) in the log;
    // they take effect at the next cycle start.
    let mut registry_changes = registry.subscribe();
    let watched = Arc::clone(&registry);
    tokio::spawn(async move {
        while registry_changes.changed().await.is_ok() {
            let count = watched.list().map(|s| s.len()).unwrap_or(0);
            info!("Registry changed, {} symbols from next cycle", count);
        }
    });

    info!(
        "Polling {} every {:?} with up to {} workers",
        config.source.base_url,
        config.poll.interval(),
        config.poll.worker_limit()
    );

    scheduler.run(&state).await;
    Ok(())
}
