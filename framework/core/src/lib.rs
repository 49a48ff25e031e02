mod abort;

pub mod prelude {
    pub use crate::abort::{AbortHandle, AbortListener, ScenarioAbortedError};
}
