use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use windlass_client::prelude::{
    convert_metrics, BenchmarkDefinition, BenchmarkService, HttpBenchmarkClient,
    HttpSutMetricsClient, SutMetrics,
};
use windlass_core::prelude::AbortHandle;

use crate::awaiter::RunAwaiter;
use crate::config::SessionConfig;
use crate::context::{RunHandle, ScenarioContext};
use crate::executor::Executor;
use crate::export::ResultExporter;
use crate::types::WindlassResult;
use crate::verify::{PhaseMetricExpectation, RunVerifier};

/// One benchmark-orchestration session, owned by a single scenario and
/// dropped with it.
///
/// Within a session, submit, start, poll, verify and export run strictly in
/// that order. Concurrent sessions are independent of each other: each owns
/// its run registry and poll loop, and the remote service is the authority
/// for run state, so the clients need no locking.
///
/// All remote work goes through the session executor so that an abort raised
/// by the harness cancels an in-flight poll loop without leaking the task.
pub struct ScenarioSession {
    executor: Executor,
    abort_handle: AbortHandle,
    benchmark: Arc<dyn BenchmarkService>,
    sut: Arc<dyn SutMetrics>,
    context: ScenarioContext,
    awaiter: RunAwaiter,
    exporter: ResultExporter,
}

impl ScenarioSession {
    /// Build a session talking to the configured HTTP services.
    pub fn new(config: SessionConfig) -> WindlassResult<Self> {
        let benchmark = Arc::new(HttpBenchmarkClient::new(config.benchmark_url.clone()));
        let sut = Arc::new(HttpSutMetricsClient::new(config.sut_url.clone()));
        Self::with_services(config, benchmark, sut)
    }

    /// Build a session over externally supplied service implementations.
    pub fn with_services(
        config: SessionConfig,
        benchmark: Arc<dyn BenchmarkService>,
        sut: Arc<dyn SutMetrics>,
    ) -> WindlassResult<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
        let abort_handle = AbortHandle::new();

        Ok(Self {
            executor: Executor::new(runtime, abort_handle.clone()),
            abort_handle,
            benchmark,
            sut,
            context: ScenarioContext::new(),
            awaiter: RunAwaiter::new(config.poll_interval, config.max_wait),
            exporter: ResultExporter::new(config.results_dir),
        })
    }

    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Handle for external cancellation, e.g. when the harness tears the
    /// scenario down early.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Resolve, submit and start a benchmark, then wait for the run to
    /// finish under the session deadline.
    ///
    /// The run is registered under its benchmark name as soon as it starts,
    /// so a later timeout still leaves the handle available for diagnostics.
    /// On timeout the best-effort run state is logged before the error is
    /// returned.
    pub fn run_benchmark(&self, definition: &BenchmarkDefinition) -> WindlassResult<RunHandle> {
        let resolved = BenchmarkDefinition::new(
            self.context.resolve(definition.body())?,
            definition.content_type(),
        );
        log::info!("Benchmark definition resolved as below\n\"{}\"", resolved.body());

        self.executor.execute_in_place(async {
            let benchmark_name = self.benchmark.submit(&resolved).await?;
            let run_id = self.benchmark.start(&benchmark_name).await?;
            log::info!("Running benchmark {benchmark_name} as run {run_id}");

            let handle = RunHandle {
                benchmark_name,
                run_id,
            };
            self.context.register_run(handle.clone());

            let benchmark = Arc::clone(&self.benchmark);
            let run_id = handle.run_id.clone();
            let is_complete = move || {
                let benchmark = Arc::clone(&benchmark);
                let run_id = run_id.clone();
                async move { Ok(benchmark.run_status(&run_id).await?.completed) }
            };

            let benchmark = Arc::clone(&self.benchmark);
            let run_id = handle.run_id.clone();
            let on_timeout = move || async move {
                let snapshot = benchmark.run_snapshot(&run_id).await;
                log::warn!("Unfinished benchmark run: {snapshot}");
            };

            self.awaiter.await_completion(is_complete, on_timeout).await?;

            Ok(handle)
        })
    }

    /// Check that the named benchmark's run finished without a failed phase.
    pub fn verify_run_succeeded(&self, benchmark_name: &str) -> WindlassResult<()> {
        let handle = self.registered_run(benchmark_name)?;
        let verifier = RunVerifier::new(Arc::clone(&self.benchmark));

        self.executor.execute_in_place(async {
            verifier.verify_no_failed_phase(&handle.run_id).await?;
            Ok(())
        })
    }

    /// Reconcile the events sent in each expectation row against the events
    /// received by that row's bridge.
    pub fn verify_event_counts(
        &self,
        benchmark_name: &str,
        expectations: &[PhaseMetricExpectation],
    ) -> WindlassResult<()> {
        let handle = self.registered_run(benchmark_name)?;
        let verifier = RunVerifier::new(Arc::clone(&self.benchmark));

        self.executor.execute_in_place(async {
            let mut counts_by_bridge = HashMap::new();
            for expectation in expectations {
                let bridge_id = self.context.bridge_id(&expectation.bridge).ok_or_else(|| {
                    anyhow::anyhow!("No bridge registered under name {}", expectation.bridge)
                })?;
                let received = self.sut.events_received(&bridge_id).await?;
                counts_by_bridge.insert(expectation.bridge.clone(), received);
            }

            verifier
                .verify_event_counts(&handle.run_id, expectations, &counts_by_bridge)
                .await?;
            Ok(())
        })
    }

    /// Store the generated run report. Persistence failures are logged and
    /// do not fail the caller.
    pub fn store_report(&self, benchmark_name: &str, file_name: &str) -> WindlassResult<()> {
        let handle = self.registered_run(benchmark_name)?;

        self.executor.execute_in_place(async {
            let report = self
                .benchmark
                .report(&handle.benchmark_name, &handle.run_id)
                .await?;
            self.exporter.export_text(file_name, &report).await;
            Ok(())
        })
    }

    /// Store the full statistics document of the run. Persistence failures
    /// are logged and do not fail the caller.
    pub fn store_stats(&self, benchmark_name: &str, file_name: &str) -> WindlassResult<()> {
        let handle = self.registered_run(benchmark_name)?;

        self.executor.execute_in_place(async {
            let stats = self.benchmark.all_stats(&handle.run_id).await?;
            self.exporter.export_json(file_name, &stats).await;
            Ok(())
        })
    }

    /// Fetch the system under test's raw metrics, convert them to JSON and
    /// store the document. Fetch and conversion failures propagate; only the
    /// write is best effort.
    pub fn store_sut_metrics(&self, file_name: &str) -> WindlassResult<()> {
        self.executor.execute_in_place(async {
            let raw = self.sut.raw_metrics().await?;
            let document = convert_metrics(&raw)?;
            self.exporter.export_json(file_name, &document).await;
            Ok(())
        })
    }

    fn registered_run(&self, benchmark_name: &str) -> WindlassResult<RunHandle> {
        self.context.run_handle(benchmark_name).ok_or_else(|| {
            anyhow::anyhow!("There is no benchmark run registered for {benchmark_name}")
        })
    }
}
