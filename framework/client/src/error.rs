use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the benchmark service or the system under test.
///
/// None of these are retried anywhere in the framework. Submissions and
/// starts mutate remote load-generation state, so retrying them would
/// double-submit load; the read operations are already governed by the
/// poll loop that calls them.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service refused the benchmark definition, e.g. it failed
    /// validation or the content type is unsupported.
    #[error("benchmark submission rejected ({status}): {body}")]
    SubmissionRejected { status: StatusCode, body: String },

    /// The service could not start a run, typically because the benchmark
    /// name is unknown.
    #[error("failed to start benchmark {benchmark_name} ({status})")]
    StartRejected {
        benchmark_name: String,
        status: StatusCode,
    },

    /// The run id is stale or was never issued. Callers must treat this as
    /// fatal, not as "not finished yet".
    #[error("run {run_id} is not known to the benchmark service")]
    UnknownRun { run_id: String },

    /// The phase or metric never ran, which points at a misconfigured
    /// expectation rather than data that has yet to arrive.
    #[error("no statistics recorded for phase {phase}, metric {metric} in run {run_id}")]
    MetricNotFound {
        run_id: String,
        phase: String,
        metric: String,
    },

    #[error("request to remote service failed")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from remote service: {0}")]
    InvalidResponse(String),
}

/// A data line in a metrics payload that could not be parsed.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("malformed metrics line {line_number}: {line:?}")]
pub struct MetricsParseError {
    pub line_number: usize,
    pub line: String,
}
