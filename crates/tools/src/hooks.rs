use std::sync::{Mutex, MutexGuard};

use crate::{args::ToolArgs, tool::ToolOutcome};

/// Side-channel observer of tool calls. Receives shared references only, so
/// it cannot change what the caller gets back.
pub trait ToolObserver: Send + Sync {
    fn before_call(&self, _tool: &str, _args: &ToolArgs) {}

    fn after_call(&self, _tool: &str, _outcome: &ToolOutcome) {}
}

/// Structured log line per call. Only the action and argument keys are logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ToolObserver for TracingObserver {
    fn before_call(&self, tool: &str, args: &ToolArgs) {
        let keys = args.keys().collect::<Vec<_>>().join(",");
        let action = args.text("action");
        tracing::info!(
            tool,
            action = action.as_deref().unwrap_or("-"),
            keys = %keys,
            "Tool call"
        );
    }

    fn after_call(&self, tool: &str, outcome: &ToolOutcome) {
        if outcome.is_error {
            tracing::warn!(tool, message = %outcome.message, "Tool call failed");
        } else {
            tracing::debug!(tool, message_len = outcome.message.len(), "Tool call succeeded");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tool: String,
    pub message: String,
    pub is_error: bool,
}

/// Records rendered results for the caller's conversation history.
#[derive(Debug, Default)]
pub struct ToolHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl ToolHistory {
    fn lock(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ToolObserver for ToolHistory {
    fn after_call(&self, tool: &str, outcome: &ToolOutcome) {
        self.lock().push(HistoryEntry {
            tool: tool.to_string(),
            message: outcome.message.clone(),
            is_error: outcome.is_error,
        });
    }
}
