use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

/// Identifies one live run of a submitted benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    pub benchmark_name: String,
    pub run_id: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no value stored for placeholder ${{{key}}}")]
    UnknownKey { key: String },

    #[error("unterminated placeholder starting at column {column}")]
    Unterminated { column: usize },
}

/// Scenario-scoped state: named test values, registered bridge ids and the
/// registry of live benchmark runs.
///
/// One context exists per scenario and is dropped with it, so no run handle
/// outlives the scenario that started the run. Concurrent scenarios each own
/// their own context and never share one.
#[derive(Debug, Default)]
pub struct ScenarioContext {
    state: RwLock<ContextState>,
}

#[derive(Debug, Default)]
struct ContextState {
    test_data: HashMap<String, String>,
    bridge_ids: HashMap<String, String>,
    runs: HashMap<String, RunHandle>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_test_data(&self, key: impl Into<String>, value: impl Into<String>) {
        self.state.write().test_data.insert(key.into(), value.into());
    }

    pub fn test_data(&self, key: &str) -> Option<String> {
        self.state.read().test_data.get(key).cloned()
    }

    pub fn set_bridge_id(&self, name: impl Into<String>, id: impl Into<String>) {
        self.state.write().bridge_ids.insert(name.into(), id.into());
    }

    pub fn bridge_id(&self, name: &str) -> Option<String> {
        self.state.read().bridge_ids.get(name).cloned()
    }

    /// Register a run under its benchmark name. A name points at one live
    /// run at a time; re-registering overwrites the previous handle.
    pub fn register_run(&self, handle: RunHandle) {
        let mut state = self.state.write();
        if let Some(previous) = state.runs.insert(handle.benchmark_name.clone(), handle) {
            log::debug!(
                "Replaced run {} registered for benchmark {}",
                previous.run_id,
                previous.benchmark_name
            );
        }
    }

    pub fn run_handle(&self, benchmark_name: &str) -> Option<RunHandle> {
        self.state.read().runs.get(benchmark_name).cloned()
    }

    /// Substitute `${key}` placeholders in a template with stored test data.
    ///
    /// Text outside placeholders passes through unchanged, including bare
    /// `$` signs without a brace.
    pub fn resolve(&self, template: &str) -> Result<String, ResolveError> {
        let state = self.state.read();
        let mut resolved = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            resolved.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or(ResolveError::Unterminated {
                column: template.len() - rest.len() + start + 1,
            })?;
            let key = &after[..end];
            let value = state
                .test_data
                .get(key)
                .ok_or_else(|| ResolveError::UnknownKey {
                    key: key.to_string(),
                })?;
            resolved.push_str(value);
            rest = &after[end + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}
