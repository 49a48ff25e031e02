use tokio::sync::watch::{Receiver, Sender};

/// Cancellation signal for one orchestration session.
///
/// The signal is latched, so a listener created after the abort was raised
/// still observes it. Cloning the handle is cheap and every listener created
/// from any clone observes the same signal.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    sender: Sender<bool>,
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::watch::channel(false).0,
        }
    }

    /// Raise the abort signal. Idempotent.
    pub fn abort(&self) {
        let was_aborted = self.sender.send_replace(true);
        if !was_aborted {
            log::debug!("Abort signal raised for session");
        }
    }

    pub fn new_listener(&self) -> AbortListener {
        AbortListener {
            receiver: self.sender.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AbortListener {
    receiver: Receiver<bool>,
}

impl AbortListener {
    /// Point in time check, usable between units of work that should not be
    /// started once the session is being torn down.
    pub fn is_aborted(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the abort signal is raised. Safe to race against other
    /// work with `tokio::select!` to cancel it.
    pub async fn wait_for_abort(&mut self) {
        // A dropped handle counts as an abort so nothing waits on a session
        // that no longer exists.
        let _ = self.receiver.wait_for(|aborted| *aborted).await;
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct ScenarioAbortedError {
    msg: String,
}

impl Default for ScenarioAbortedError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by session abort signal".to_string(),
        }
    }
}
