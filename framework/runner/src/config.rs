use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use url::Url;

use crate::awaiter::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};

/// Connection and timing configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the benchmark-execution service.
    pub benchmark_url: Url,
    /// Base URL of the system under test's metrics endpoint.
    pub sut_url: Url,
    /// Directory that result artifacts are written into.
    pub results_dir: PathBuf,
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl SessionConfig {
    pub fn new(benchmark_url: Url, sut_url: Url) -> Self {
        Self {
            benchmark_url,
            sut_url,
            results_dir: PathBuf::from("results"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Read the service endpoints and results directory from the
    /// environment. The timing fields keep their defaults; the deadline is a
    /// safety net, not a per-run tuning knob.
    pub fn from_env() -> anyhow::Result<Self> {
        let benchmark_url = required_url("WINDLASS_BENCHMARK_URL")?;
        let sut_url = required_url("WINDLASS_SUT_URL")?;

        let mut config = Self::new(benchmark_url, sut_url);
        if let Ok(dir) = std::env::var("WINDLASS_RESULTS_DIR") {
            config.results_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

fn required_url(name: &str) -> anyhow::Result<Url> {
    let raw = std::env::var(name).with_context(|| format!("{name} is not set"))?;
    Url::parse(&raw).with_context(|| format!("{name} is not a valid URL: {raw}"))
}
