use std::future::Future;

use windlass_core::prelude::{AbortHandle, ScenarioAbortedError};

/// Runs session futures on the owned runtime while listening for the
/// session abort signal.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
    abort_handle: AbortHandle,
}

impl Executor {
    pub(crate) fn new(runtime: tokio::runtime::Runtime, abort_handle: AbortHandle) -> Self {
        Self {
            runtime,
            abort_handle,
        }
    }

    /// Block on async work until it completes or the session is aborted.
    ///
    /// The future is dropped when the abort signal wins the race, so nothing
    /// keeps polling after the scenario has been torn down. Submitted work
    /// must tolerate being cancelled at an await point.
    pub fn execute_in_place<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        let mut abort_listener = self.abort_handle.new_listener();
        self.runtime.block_on(async move {
            tokio::select! {
                result = fut => result,
                _ = abort_listener.wait_for_abort() => {
                    Err(anyhow::anyhow!(ScenarioAbortedError::default()))
                },
            }
        })
    }
}
