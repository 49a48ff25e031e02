mod benchmark;
mod error;
mod metrics;
mod sut;

pub mod prelude {
    pub use crate::benchmark::{
        BenchmarkDefinition, BenchmarkService, HttpBenchmarkClient, RunStatus,
    };
    pub use crate::error::{ClientError, MetricsParseError};
    pub use crate::metrics::convert_metrics;
    pub use crate::sut::{HttpSutMetricsClient, SutMetrics};
}
