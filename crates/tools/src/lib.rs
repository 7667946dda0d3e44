//! Agent-facing tool adapters for the project-management backend.
//!
//! Every tool takes an `action` plus flat named arguments, performs at most
//! one HTTP request, and always answers with a [`ToolOutcome`]. Failures are
//! rendered into the outcome message; nothing is raised to the caller.

pub mod api;
pub mod args;
pub mod error;
pub mod file;
pub mod hooks;
pub mod project;
pub mod task;
pub mod tool;
pub mod transport;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use api::ApiClient;
pub use args::ToolArgs;
pub use error::{ToolError, TransportError};
pub use file::FileClient;
pub use hooks::{HistoryEntry, ToolHistory, ToolObserver, TracingObserver};
pub use project::ProjectClient;
pub use task::{TaskClient, TaskUpdate};
pub use tool::{Tool, ToolOutcome, ToolRegistry};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use workspace::WorkspaceClient;
