use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    api::ApiClient, args::ToolArgs, error::ToolError, file::FileClient, hooks::ToolObserver,
    project::ProjectClient, task::TaskClient, workspace::WorkspaceClient,
};

/// What a tool hands back to the agent. These tools never end the agent's
/// loop, so `halts_caller_loop` is always false for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    pub message: String,
    pub is_error: bool,
    pub halts_caller_loop: bool,
}

impl ToolOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            halts_caller_loop: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            halts_caller_loop: false,
        }
    }
}

impl From<Result<String, ToolError>> for ToolOutcome {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name, e.g. `"task"`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Accepted values of the `action` argument, in documentation order.
    fn actions(&self) -> &'static [&'static str];

    async fn execute(&self, args: &ToolArgs) -> ToolOutcome;
}

/// Named tools plus the observers notified around every call.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
    observers: Vec<Arc<dyn ToolObserver>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All four backend tools sharing one API client.
    pub fn with_backend_tools(api: ApiClient) -> Self {
        let mut registry = Self::new();
        registry.register(WorkspaceClient::new(api.clone()));
        registry.register(ProjectClient::new(api.clone()));
        registry.register(TaskClient::new(api.clone()));
        registry.register(FileClient::new(api));
        registry
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Arc::new(tool));
    }

    pub fn observe(&mut self, observer: Arc<dyn ToolObserver>) {
        self.observers.push(observer);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    /// Runs one tool call. Observers see the arguments first and the final
    /// outcome last; they only get shared references.
    pub async fn invoke(&self, name: &str, args: &ToolArgs) -> ToolOutcome {
        for observer in &self.observers {
            observer.before_call(name, args);
        }

        let outcome = match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => ToolOutcome::failure(format!("Error: Tool '{}' not found.", name)),
        };

        for observer in &self.observers {
            observer.after_call(name, &outcome);
        }
        outcome
    }
}
