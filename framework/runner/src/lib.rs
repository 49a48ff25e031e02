mod awaiter;
mod config;
mod context;
mod executor;
mod export;
mod init;
mod session;
mod types;
mod verify;

pub mod prelude {
    pub use crate::awaiter::{AwaitError, RunAwaiter, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
    pub use crate::config::SessionConfig;
    pub use crate::context::{ResolveError, RunHandle, ScenarioContext};
    pub use crate::export::{ExportError, ResultExporter};
    pub use crate::init::init_logging;
    pub use crate::session::ScenarioSession;
    pub use crate::types::WindlassResult;
    pub use crate::verify::{PhaseMetricExpectation, RunVerifier, VerifyError};

    pub use windlass_client::prelude::*;
    pub use windlass_core::prelude::*;
}
