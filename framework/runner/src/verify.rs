use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use windlass_client::prelude::{BenchmarkService, ClientError};

/// One row of an expectation table: the sent count of the named phase and
/// metric is compared against the events received by the named bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseMetricExpectation {
    pub phase: String,
    pub metric: String,
    pub bridge: String,
}

#[derive(Error, Debug)]
pub enum VerifyError {
    /// At least one phase of the run failed. Carries the best-effort remote
    /// state dump for triage.
    #[error("run {run_id} finished with a failed phase; run state: {snapshot}")]
    PhaseFailure { run_id: String, snapshot: String },

    #[error(
        "phase {phase}, metric {metric}: sent {sent} events but bridge {bridge} \
         received {received} (counts must match and be positive)"
    )]
    CountMismatch {
        phase: String,
        metric: String,
        bridge: String,
        sent: u64,
        received: u64,
    },

    #[error("no received count supplied for bridge {bridge}")]
    MissingBridgeCount { bridge: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Post-completion checks for a benchmark run.
pub struct RunVerifier {
    benchmark: Arc<dyn BenchmarkService>,
}

impl RunVerifier {
    pub fn new(benchmark: Arc<dyn BenchmarkService>) -> Self {
        Self { benchmark }
    }

    /// Fail if any phase of the run reported failure.
    pub async fn verify_no_failed_phase(&self, run_id: &str) -> Result<(), VerifyError> {
        let status = self.benchmark.run_status(run_id).await?;
        if status.failed_phase {
            let snapshot = self.benchmark.run_snapshot(run_id).await;
            return Err(VerifyError::PhaseFailure {
                run_id: run_id.to_string(),
                snapshot,
            });
        }
        Ok(())
    }

    /// Reconcile sent counts against received counts, row by row.
    ///
    /// Rows are evaluated independently and in order; the first violated row
    /// fails the verification and names itself, whatever the earlier rows
    /// did. Sent and received come from two different systems and are only
    /// eventually consistent with each other, so a mismatch observed here is
    /// a hard failure rather than a condition to wait out.
    pub async fn verify_event_counts(
        &self,
        run_id: &str,
        expectations: &[PhaseMetricExpectation],
        counts_by_bridge: &HashMap<String, u64>,
    ) -> Result<(), VerifyError> {
        for expectation in expectations {
            let received = *counts_by_bridge.get(&expectation.bridge).ok_or_else(|| {
                VerifyError::MissingBridgeCount {
                    bridge: expectation.bridge.clone(),
                }
            })?;

            let sent = self
                .benchmark
                .sent_count(run_id, &expectation.phase, &expectation.metric)
                .await?;

            if sent != received || sent == 0 {
                return Err(VerifyError::CountMismatch {
                    phase: expectation.phase.clone(),
                    metric: expectation.metric.clone(),
                    bridge: expectation.bridge.clone(),
                    sent,
                    received,
                });
            }
        }

        Ok(())
    }
}
