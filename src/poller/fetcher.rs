use crate::error::{Error, Result};
use crate::types::symbol::Symbol;
use async_trait::async_trait;
use std::time::Duration;

/// Source of raw quote payloads, one HTTP GET per symbol.
///
/// No retry policy lives here; retries, if any, belong to the orchestrator.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch(&self, symbol: &Symbol) -> Result<String>;
}

/// Fetches the public quote page at `{base_url}/{symbol}` with a bounded
/// request timeout.
pub struct HttpQuoteFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpQuoteFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpQuoteFetcher {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl QuoteFetcher for HttpQuoteFetcher {
    async fn fetch(&self, symbol: &Symbol) -> Result<String> {
        let url = format!("{}/{}", self.base_url, symbol);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout {
                    symbol: symbol.clone(),
                }
            } else {
                Error::FetchError {
                    symbol: symbol.clone(),
                    cause: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchStatus {
                symbol: symbol.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| Error::FetchError {
            symbol: symbol.clone(),
            cause: e.to_string(),
        })
    }
}
