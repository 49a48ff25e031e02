use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

/// A load-test definition ready for submission, with any placeholders
/// already resolved. Immutable once built; discarded after submission.
#[derive(Debug, Clone)]
pub struct BenchmarkDefinition {
    body: String,
    content_type: String,
}

impl BenchmarkDefinition {
    pub fn new(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Point in time state of a run. Fetched fresh on every poll, never cached
/// across polls.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RunStatus {
    pub completed: bool,
    pub failed_phase: bool,
}

/// Contract with the benchmark-execution service.
///
/// The status and statistics reads are safe to repeat and must not mutate
/// run state on the remote side.
#[async_trait]
pub trait BenchmarkService: Send + Sync {
    /// Upload a definition, returning the benchmark name assigned by the
    /// service.
    async fn submit(&self, definition: &BenchmarkDefinition) -> Result<String, ClientError>;

    /// Begin one run of a previously submitted benchmark.
    async fn start(&self, benchmark_name: &str) -> Result<String, ClientError>;

    /// Read-only status fetch for a run.
    async fn run_status(&self, run_id: &str) -> Result<RunStatus, ClientError>;

    /// Total requests sent for one phase and metric of a run.
    async fn sent_count(
        &self,
        run_id: &str,
        phase: &str,
        metric: &str,
    ) -> Result<u64, ClientError>;

    /// Human-readable report for a run. Only meaningful once the run has
    /// completed.
    async fn report(&self, benchmark_name: &str, run_id: &str) -> Result<String, ClientError>;

    /// Full statistics document for a run. Only meaningful once the run has
    /// completed.
    async fn all_stats(&self, run_id: &str) -> Result<serde_json::Value, ClientError>;

    /// Best-effort dump of the run's remote state, used only as failure
    /// context. Never fails the caller; degrades to a placeholder when the
    /// service cannot answer.
    async fn run_snapshot(&self, run_id: &str) -> String;
}

#[derive(Deserialize)]
struct BenchmarkCreated {
    name: String,
}

#[derive(Deserialize)]
struct RunStarted {
    id: String,
}

#[derive(Deserialize)]
struct SentCount {
    count: u64,
}

/// HTTP binding of [BenchmarkService].
#[derive(Debug, Clone)]
pub struct HttpBenchmarkClient {
    base: String,
    client: reqwest::Client,
}

impl HttpBenchmarkClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base: base_url.as_str().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BenchmarkService for HttpBenchmarkClient {
    async fn submit(&self, definition: &BenchmarkDefinition) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/benchmark", self.base))
            .header(reqwest::header::CONTENT_TYPE, definition.content_type())
            .body(definition.body().to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::SubmissionRejected { status, body });
        }

        let created: BenchmarkCreated = response.json().await?;
        Ok(created.name)
    }

    async fn start(&self, benchmark_name: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/benchmark/{}/start", self.base, benchmark_name))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::StartRejected {
                benchmark_name: benchmark_name.to_string(),
                status: response.status(),
            });
        }

        let started: RunStarted = response.json().await?;
        Ok(started.id)
    }

    async fn run_status(&self, run_id: &str) -> Result<RunStatus, ClientError> {
        let response = self
            .client
            .get(format!("{}/run/{}/status", self.base, run_id))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::UnknownRun {
                run_id: run_id.to_string(),
            }),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(ClientError::InvalidResponse(format!(
                "status fetch for run {run_id} returned {status}"
            ))),
        }
    }

    async fn sent_count(
        &self,
        run_id: &str,
        phase: &str,
        metric: &str,
    ) -> Result<u64, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/run/{}/stats/{}/{}",
                self.base, run_id, phase, metric
            ))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::MetricNotFound {
                run_id: run_id.to_string(),
                phase: phase.to_string(),
                metric: metric.to_string(),
            }),
            status if status.is_success() => {
                let sent: SentCount = response.json().await?;
                Ok(sent.count)
            }
            status => Err(ClientError::InvalidResponse(format!(
                "stats fetch for run {run_id} returned {status}"
            ))),
        }
    }

    async fn report(&self, benchmark_name: &str, run_id: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/benchmark/{}/run/{}/report",
                self.base, benchmark_name, run_id
            ))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::UnknownRun {
                run_id: run_id.to_string(),
            }),
            status if status.is_success() => Ok(response.text().await?),
            status => Err(ClientError::InvalidResponse(format!(
                "report fetch for run {run_id} returned {status}"
            ))),
        }
    }

    async fn all_stats(&self, run_id: &str) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .get(format!("{}/run/{}/stats/all", self.base, run_id))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::UnknownRun {
                run_id: run_id.to_string(),
            }),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(ClientError::InvalidResponse(format!(
                "stats document fetch for run {run_id} returned {status}"
            ))),
        }
    }

    async fn run_snapshot(&self, run_id: &str) -> String {
        let fetched = async {
            self.client
                .get(format!("{}/run/{}", self.base, run_id))
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        }
        .await;

        match fetched {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::debug!("Could not fetch state of run {run_id}: {e:?}");
                format!("<state of run {run_id} unavailable>")
            }
        }
    }
}
