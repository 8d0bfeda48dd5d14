use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod loader;

pub use loader::AppConfig;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Base URL of the quote page; the per-symbol URL is `{base_url}/{symbol}`.
    pub base_url: String,
    /// Marker that identifies price fragments in the scraped page text.
    pub currency_marker: String,
    /// Per-request timeout for a single symbol fetch.
    pub request_timeout_secs: u64,
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: "https://www.google.com/finance/quote".to_string(),
            currency_marker: "$".to_string(),
            request_timeout_secs: 5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PollConfig {
    /// Cadence of the poll loop.
    pub interval_secs: u64,
    /// Bound on concurrent per-symbol poll units. 0 means derive from the
    /// machine: twice the available parallelism.
    pub max_workers: usize,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn worker_limit(&self) -> usize {
        if self.max_workers > 0 {
            return self.max_workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get() * 2)
            .unwrap_or(8)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval_secs: 10,
            max_workers: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Newline-delimited symbol watch-list, one upper-case symbol per line.
    pub registry_path: String,
    /// `symbol,price` per line, overwritten wholesale each cycle.
    pub snapshot_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            registry_path: "data/symbols.txt".to_string(),
            snapshot_path: "data/snapshot.csv".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Display-service endpoint that receives the empty-body "data updated" POST.
    pub update_url: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig {
            update_url: "http://127.0.0.1:1337/update_data".to_string(),
        }
    }
}
