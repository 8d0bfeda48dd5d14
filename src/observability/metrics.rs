use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, HistogramOpts, IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Cycle metrics
    pub static ref CYCLES_COMPLETED: Counter = Counter::new(
        "poll_cycles_total",
        "Total number of completed poll cycles"
    ).unwrap();

    pub static ref CYCLE_FAILURES: Counter = Counter::new(
        "poll_cycle_failures_total",
        "Total number of poll cycles that failed outright"
    ).unwrap();

    // Per-symbol metrics
    pub static ref QUOTES_COLLECTED: Counter = Counter::new(
        "quotes_collected_total",
        "Total number of validated quotes collected"
    ).unwrap();

    pub static ref SYMBOL_POLL_FAILURES: Counter = Counter::new(
        "symbol_poll_failures_total",
        "Total number of per-symbol fetch/extract/validate failures"
    ).unwrap();

    pub static ref TRACKED_SYMBOLS: IntGauge = IntGauge::new(
        "tracked_symbols",
        "Number of symbols in the registry at cycle start"
    ).unwrap();

    // Notification metrics
    pub static ref NOTIFICATIONS_SENT: Counter = Counter::new(
        "update_notifications_total",
        "Total number of data-updated notifications dispatched"
    ).unwrap();

    // Latency metrics
    pub static ref CYCLE_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "poll_cycle_duration_seconds",
            "Wall-clock duration of one poll cycle"
        ).buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
    ).unwrap();
}

pub fn register_metrics() {
    REGISTRY.register(Box::new(CYCLES_COMPLETED.clone())).unwrap();
    REGISTRY.register(Box::new(CYCLE_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(QUOTES_COLLECTED.clone())).unwrap();
    REGISTRY.register(Box::new(SYMBOL_POLL_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(TRACKED_SYMBOLS.clone())).unwrap();
    REGISTRY.register(Box::new(NOTIFICATIONS_SENT.clone())).unwrap();
    REGISTRY.register(Box::new(CYCLE_LATENCY.clone())).unwrap();
}
