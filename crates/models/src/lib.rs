//! Wire types for the project-management backend.
//!
//! Field names follow the backend's camelCase JSON. Everything the adapters
//! only display is optional, so partial payloads still render.

pub mod attachment;
pub mod ids;
pub mod project;
pub mod task;
pub mod types;
pub mod workspace;

pub use attachment::{Attachment, StoredFile};
pub use ids::ResourceId;
pub use project::Project;
pub use task::{Task, TaskBoard, TaskColumn, flatten_task_listing};
pub use types::{TaskPriority, TaskStatus};
pub use workspace::{Workspace, WorkspaceMember};
