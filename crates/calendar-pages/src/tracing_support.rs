//! Logging setup and the page action trace.
//!
//! Page actions emit `tracing` events as they run. In addition, every
//! page-level action is recorded in an [`ActionTrace`] so a failing test can
//! dump exactly which steps ran, how long they took and which one broke.

use crate::result::PageResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Default upper bound on recorded actions
pub const DEFAULT_MAX_ACTIONS: usize = 10_000;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
///
/// Returns false when a global subscriber was already installed, which makes
/// it safe to call from every test.
pub fn init_logging(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}

/// Outcome of a traced action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    /// Still running
    Running,
    /// Completed successfully
    Ok,
    /// Completed with an error
    Failed,
}

/// One page-level action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracedAction {
    /// Unique action ID
    pub id: String,
    /// Action name, e.g. `open_day_view`
    pub name: String,
    /// Start (ms since the trace started)
    pub start_ms: u64,
    /// Duration in ms, once finished
    pub duration_ms: Option<u64>,
    /// Action details (selector, title, direction...)
    pub attributes: BTreeMap<String, String>,
    /// Outcome
    pub status: ActionStatus,
    /// Error text when failed
    pub error: Option<String>,
}

impl TracedAction {
    fn new(name: &str, start_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            start_ms,
            duration_ms: None,
            attributes: BTreeMap::new(),
            status: ActionStatus::Running,
            error: None,
        }
    }

    /// Check if the action finished
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.duration_ms.is_some()
    }
}

/// Ordered record of page actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionTrace {
    #[serde(skip, default = "Instant::now")]
    started: Instant,
    max_actions: usize,
    dropped: usize,
    actions: Vec<TracedAction>,
}

impl Default for ActionTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTrace {
    /// Create an empty trace
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_actions(DEFAULT_MAX_ACTIONS)
    }

    /// Create a trace that keeps at most `max_actions`
    #[must_use]
    pub fn with_max_actions(max_actions: usize) -> Self {
        Self {
            started: Instant::now(),
            max_actions,
            dropped: 0,
            actions: Vec::new(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Start recording an action; returns its ID
    pub fn begin(&mut self, name: &str, attributes: &[(&str, String)]) -> String {
        let mut action = TracedAction::new(name, self.elapsed_ms());
        for (key, value) in attributes {
            let _ = action.attributes.insert((*key).to_string(), value.clone());
        }
        let id = action.id.clone();
        if self.actions.len() >= self.max_actions {
            // oldest first
            let _ = self.actions.remove(0);
            self.dropped += 1;
        }
        self.actions.push(action);
        id
    }

    /// Finish an action, failed when `error` is set
    pub fn end(&mut self, id: &str, error: Option<&dyn std::fmt::Display>) {
        let now = self.elapsed_ms();
        if let Some(action) = self.actions.iter_mut().rev().find(|a| a.id == id) {
            action.duration_ms = Some(now.saturating_sub(action.start_ms));
            match error {
                Some(err) => {
                    action.status = ActionStatus::Failed;
                    action.error = Some(err.to_string());
                }
                None => action.status = ActionStatus::Ok,
            }
        }
    }

    /// All recorded actions, oldest first
    #[must_use]
    pub fn actions(&self) -> &[TracedAction] {
        &self.actions
    }

    /// Names of recorded actions, oldest first
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    /// Actions that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&TracedAction> {
        self.actions
            .iter()
            .filter(|a| a.status == ActionStatus::Failed)
            .collect()
    }

    /// Number of actions evicted because of `max_actions`
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> PageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save as JSON
    pub fn save_json(&self, path: &Path) -> PageResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from JSON
    pub fn load_json(path: &Path) -> PageResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::PageError;

    mod action_trace_tests {
        use super::*;

        #[test]
        fn test_begin_and_end_ok() {
            let mut trace = ActionTrace::new();
            let id = trace.begin("open_day_view", &[("selector", "#day-view".to_string())]);
            assert_eq!(trace.actions()[0].status, ActionStatus::Running);
            trace.end(&id, None);

            let action = &trace.actions()[0];
            assert!(action.is_complete());
            assert_eq!(action.status, ActionStatus::Ok);
            assert_eq!(action.attributes["selector"], "#day-view");
        }

        #[test]
        fn test_failed_action_keeps_error() {
            let mut trace = ActionTrace::new();
            let id = trace.begin("swipe", &[]);
            let err = PageError::invalid_argument("swipe needs a direction");
            trace.end(&id, Some(&err));

            let failures = trace.failures();
            assert_eq!(failures.len(), 1);
            assert!(failures[0]
                .error
                .as_deref()
                .unwrap()
                .contains("swipe needs a direction"));
        }

        #[test]
        fn test_max_actions_evicts_oldest() {
            let mut trace = ActionTrace::with_max_actions(2);
            for name in ["launch", "open_month_view", "click_today"] {
                let id = trace.begin(name, &[]);
                trace.end(&id, None);
            }
            assert_eq!(trace.names(), vec!["open_month_view", "click_today"]);
            assert_eq!(trace.dropped(), 1);
        }

        #[test]
        fn test_save_and_load() {
            let mut trace = ActionTrace::new();
            let id = trace.begin("create_event", &[("title", "Lunch".to_string())]);
            trace.end(&id, None);

            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("trace.json");
            trace.save_json(&path).unwrap();

            let loaded = ActionTrace::load_json(&path).unwrap();
            assert_eq!(loaded.names(), vec!["create_event"]);
            assert_eq!(loaded.actions()[0].attributes["title"], "Lunch");
        }
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let _ = init_logging("debug");
        assert!(!init_logging("debug"));
    }
}
