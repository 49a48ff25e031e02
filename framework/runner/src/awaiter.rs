use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use windlass_client::prelude::ClientError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Error, Debug)]
pub enum AwaitError {
    /// The external deadline fired before the run finished. Runs are
    /// normally bounded by the load test's own scenario timeout, so this
    /// deadline is the safety net for a hung remote side.
    #[error("run did not complete within {}s", waited.as_secs())]
    Timeout { waited: Duration },

    /// The completion predicate itself failed. A transport error or an
    /// unknown run id is not the same thing as "not finished yet" and is
    /// never polled again.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Polls a completion predicate at a fixed interval under one absolute
/// deadline measured from call entry. The deadline is never extended.
#[derive(Debug, Clone, Copy)]
pub struct RunAwaiter {
    poll_interval: Duration,
    max_wait: Duration,
}

impl Default for RunAwaiter {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl RunAwaiter {
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poll_interval,
            max_wait,
        }
    }

    /// Wait until `is_complete` returns true.
    ///
    /// The wait between polls is pure, nothing is evaluated and no side
    /// effect occurs. If the deadline is reached first then `on_timeout`
    /// runs exactly once before the timeout error is returned, giving the
    /// caller a chance to capture a diagnostic snapshot of the stuck run.
    pub async fn await_completion<P, PFut, D, DFut>(
        &self,
        mut is_complete: P,
        on_timeout: D,
    ) -> Result<(), AwaitError>
    where
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<bool, ClientError>>,
        D: FnOnce() -> DFut,
        DFut: Future<Output = ()>,
    {
        let deadline = Instant::now() + self.max_wait;

        let poll_loop = async {
            loop {
                if is_complete().await? {
                    return Ok(());
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout_at(deadline, poll_loop).await {
            Ok(result) => result,
            Err(_) => {
                on_timeout().await;
                Err(AwaitError::Timeout {
                    waited: self.max_wait,
                })
            }
        }
    }
}
