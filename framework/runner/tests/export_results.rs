use pretty_assertions::assert_eq;
use serde_json::json;
use windlass_runner::prelude::{ExportError, ResultExporter};

#[tokio::test]
async fn writes_text_and_json_artifacts_into_the_results_directory() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = ResultExporter::new(dir.path().join("results"));

    exporter
        .try_export_text("run.report", "phase steady: 100 requests")
        .await
        .unwrap();
    exporter
        .try_export_json("stats.json", &json!({ "total": 100 }))
        .await
        .unwrap();

    let report = std::fs::read_to_string(dir.path().join("results/run.report")).unwrap();
    assert_eq!(report, "phase steady: 100 requests");

    let stats: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("results/stats.json")).unwrap())
            .unwrap();
    assert_eq!(stats, json!({ "total": 100 }));
}

#[tokio::test]
async fn unwritable_sink_surfaces_as_a_typed_export_error() {
    let dir = tempfile::tempdir().unwrap();
    // A plain file where the results directory should be makes every write
    // fail, the closest stand-in for a full or read-only disk.
    let blocking_file = dir.path().join("results");
    std::fs::write(&blocking_file, b"occupied").unwrap();

    let exporter = ResultExporter::new(&blocking_file);
    let err = exporter
        .try_export_json("stats.json", &json!({ "total": 100 }))
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Io { file_name, .. } if file_name == "stats.json"));
}

#[tokio::test]
async fn downgrading_lane_swallows_the_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocking_file = dir.path().join("results");
    std::fs::write(&blocking_file, b"occupied").unwrap();

    let exporter = ResultExporter::new(&blocking_file);

    // Only observable through the warning log; the call itself must not fail.
    exporter.export_json("stats.json", &json!({ "total": 100 })).await;
    exporter.export_text("run.report", "content").await;
}

mod session_outcome {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use url::Url;
    use windlass_runner::prelude::{
        BenchmarkDefinition, BenchmarkService, ClientError, RunStatus, ScenarioSession,
        SessionConfig, SutMetrics,
    };

    struct CompletedBenchmark;

    #[async_trait]
    impl BenchmarkService for CompletedBenchmark {
        async fn submit(&self, _definition: &BenchmarkDefinition) -> Result<String, ClientError> {
            Ok("ingest-events".to_string())
        }

        async fn start(&self, _benchmark_name: &str) -> Result<String, ClientError> {
            Ok("run-1".to_string())
        }

        async fn run_status(&self, _run_id: &str) -> Result<RunStatus, ClientError> {
            Ok(RunStatus {
                completed: true,
                failed_phase: false,
            })
        }

        async fn sent_count(
            &self,
            _run_id: &str,
            _phase: &str,
            _metric: &str,
        ) -> Result<u64, ClientError> {
            Ok(100)
        }

        async fn report(
            &self,
            _benchmark_name: &str,
            _run_id: &str,
        ) -> Result<String, ClientError> {
            Ok("report".to_string())
        }

        async fn all_stats(&self, _run_id: &str) -> Result<serde_json::Value, ClientError> {
            Ok(json!({ "total": 100 }))
        }

        async fn run_snapshot(&self, _run_id: &str) -> String {
            "snapshot".to_string()
        }
    }

    struct NoSut;

    #[async_trait]
    impl SutMetrics for NoSut {
        async fn events_received(&self, _bridge_id: &str) -> Result<u64, ClientError> {
            Ok(100)
        }

        async fn raw_metrics(&self) -> Result<String, ClientError> {
            Ok(String::new())
        }
    }

    #[test]
    fn export_failure_does_not_override_a_successful_verification() {
        let dir = tempfile::tempdir().unwrap();
        let blocking_file = dir.path().join("results");
        std::fs::write(&blocking_file, b"occupied").unwrap();

        let mut config = SessionConfig::new(
            Url::parse("http://benchmark.invalid").unwrap(),
            Url::parse("http://sut.invalid").unwrap(),
        );
        config.results_dir = blocking_file;
        config.poll_interval = Duration::from_millis(10);
        config.max_wait = Duration::from_secs(5);

        let session =
            ScenarioSession::with_services(config, Arc::new(CompletedBenchmark), Arc::new(NoSut))
                .unwrap();

        session
            .run_benchmark(&BenchmarkDefinition::new("{}", "application/json"))
            .unwrap();
        session.verify_run_succeeded("ingest-events").unwrap();

        // The sink is unwritable, but a completed verification must not be
        // failed retroactively by artifact persistence.
        session.store_report("ingest-events", "run.report").unwrap();
        session.store_stats("ingest-events", "stats.json").unwrap();
    }
}
