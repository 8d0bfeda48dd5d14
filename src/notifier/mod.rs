use crate::error::{Error, Result};
use crate::observability::metrics::NOTIFICATIONS_SENT;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Outbound "data updated" signal to the display service.
///
/// The trigger carries no payload; the display service pulls the new snapshot
/// through its own read path. Behind a trait so the transport (webhook,
/// pub/sub, socket push) can change without touching pipeline logic.
#[async_trait]
pub trait UpdateSink: Send + Sync {
    async fn publish_update(&self) -> Result<()>;
}

/// Empty-body HTTP POST to the configured display-service endpoint.
pub struct HttpUpdateSink {
    update_url: String,
    client: reqwest::Client,
}

impl HttpUpdateSink {
    pub fn new(update_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpUpdateSink {
            update_url: update_url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl UpdateSink for HttpUpdateSink {
    async fn publish_update(&self) -> Result<()> {
        let response = self
            .client
            .post(&self.update_url)
            .send()
            .await
            .map_err(|e| Error::NotifyError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NotifyError(format!(
                "display service answered {status}"
            )));
        }
        Ok(())
    }
}

/// Decides whether the display service needs a nudge.
///
/// The comparison is raw-text equality, not a semantic diff: cheap and
/// conservative, at the cost of a spurious "changed" if serialization
/// formatting ever varied without value changes.
pub struct ChangeNotifier {
    sink: Box<dyn UpdateSink>,
}

impl ChangeNotifier {
    pub fn new(sink: Box<dyn UpdateSink>) -> Self {
        ChangeNotifier { sink }
    }

    /// Dispatch exactly one update if the serialized snapshots differ.
    /// Returns whether a dispatch happened.
    pub async fn notify_if_changed(&self, previous_raw: &str, new_raw: &str) -> Result<bool> {
        if previous_raw == new_raw {
            debug!("Snapshot unchanged, skipping notification");
            return Ok(false);
        }

        self.sink.publish_update().await?;
        NOTIFICATIONS_SENT.inc();
        info!("Dispatched data-updated notification");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct CountingSink {
        dispatches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl UpdateSink for CountingSink {
        async fn publish_update(&self) -> Result<()> {
            self.dispatches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counting_notifier() -> (ChangeNotifier, Arc<AtomicUsize>) {
        let dispatches = Arc::new(AtomicUsize::new(0));
        let notifier = ChangeNotifier::new(Box::new(CountingSink {
            dispatches: Arc::clone(&dispatches),
        }));
        (notifier, dispatches)
    }

    #[tokio::test]
    async fn identical_raw_text_is_a_noop() {
        let (notifier, dispatches) = counting_notifier();
        let raw = "AAPL,150.00\nMSFT,300.00";

        assert!(!notifier.notify_if_changed(raw, raw).await.unwrap());
        assert_eq!(dispatches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn differing_raw_text_dispatches_exactly_once() {
        let (notifier, dispatches) = counting_notifier();

        let changed = notifier
            .notify_if_changed("AAPL,150.00", "AAPL,151.00")
            .await
            .unwrap();
        assert!(changed);
        assert_eq!(dispatches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_snapshot_counts_as_changed() {
        let (notifier, dispatches) = counting_notifier();

        assert!(notifier.notify_if_changed("", "AAPL,150.00").await.unwrap());
        assert_eq!(dispatches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn http_sink_posts_to_update_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update_data"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpUpdateSink::new(
            &format!("{}/update_data", server.uri()),
            Duration::from_secs(1),
        )
        .unwrap();
        sink.publish_update().await.unwrap();
    }

    #[tokio::test]
    async fn http_sink_surfaces_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sink = HttpUpdateSink::new(&server.uri(), Duration::from_secs(1)).unwrap();
        let err = sink.publish_update().await.unwrap_err();
        assert!(matches!(err, Error::NotifyError(_)));
    }
}
