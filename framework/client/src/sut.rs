use async_trait::async_trait;
use url::Url;

use crate::error::ClientError;

/// Contract with the system under test's metrics endpoint.
#[async_trait]
pub trait SutMetrics: Send + Sync {
    /// Number of events the bridge has received so far.
    async fn events_received(&self, bridge_id: &str) -> Result<u64, ClientError>;

    /// Raw exposition-format metrics payload.
    async fn raw_metrics(&self) -> Result<String, ClientError>;
}

/// HTTP binding of [SutMetrics].
#[derive(Debug, Clone)]
pub struct HttpSutMetricsClient {
    base: String,
    client: reqwest::Client,
}

impl HttpSutMetricsClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base: base_url.as_str().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SutMetrics for HttpSutMetricsClient {
    async fn events_received(&self, bridge_id: &str) -> Result<u64, ClientError> {
        let body = self
            .client
            .get(format!("{}/events/{}/count", self.base, bridge_id))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        body.trim().parse().map_err(|_| {
            ClientError::InvalidResponse(format!(
                "received-events count for bridge {bridge_id} is not an integer: {body:?}"
            ))
        })
    }

    async fn raw_metrics(&self) -> Result<String, ClientError> {
        Ok(self
            .client
            .get(format!("{}/q/metrics", self.base))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}
