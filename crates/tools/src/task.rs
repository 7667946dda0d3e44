use std::str::FromStr;

use async_trait::async_trait;
use models::{Attachment, Task, TaskPriority, TaskStatus, flatten_task_listing};
use serde::Serialize;
use serde_json::Value;
use strum::VariantNames as _;
use strum_macros::{Display, EnumString, VariantNames};

use crate::{
    api::{ApiClient, segment, with_query},
    args::ToolArgs,
    error::ToolError,
    tool::{Tool, ToolOutcome},
    transport::HttpMethod,
};

const RESOURCE: &str = "task";

const EMPTY_UPDATE: &str = "At least one field must be provided for update \
    (title, description, status, priority, user_email, position, due_date)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum TaskAction {
    Create,
    List,
    Get,
    Update,
    UpdateStatus,
    UpdateAssignee,
    UpdatePriority,
    Delete,
    GetAttachments,
}

fn parse_status(raw: &str) -> Result<TaskStatus, ToolError> {
    TaskStatus::parse_assignable(raw).ok_or_else(|| {
        ToolError::Validation(format!(
            "Invalid status '{}'. Valid statuses: {}",
            raw,
            TaskStatus::assignable_names()
        ))
    })
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ToolError> {
    TaskPriority::from_str(raw).map_err(|_| {
        ToolError::Validation(format!(
            "Invalid priority '{}'. Valid priorities: {}",
            raw,
            TaskPriority::names()
        ))
    })
}

/// Partial task update. Unset fields are left out of the request body, so
/// the backend keeps their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// An empty email unassigns the task.
    pub fn user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Tasks are never removed; they are overwritten with a tombstone.
    pub fn soft_delete() -> Self {
        Self::new()
            .status(TaskStatus::Deleted)
            .title("Deleted Task")
            .description("")
            .position(0)
            .priority(TaskPriority::Low)
            .user_email("")
    }

    /// Title and due date count only when non-empty. Description and
    /// assignee count whenever supplied, so `""` clears them.
    fn from_args(args: &ToolArgs) -> Result<Self, ToolError> {
        let update = Self {
            title: args.text("title"),
            description: args.present_text("description"),
            status: args.text("status").as_deref().map(parse_status).transpose()?,
            priority: args.text("priority").as_deref().map(parse_priority).transpose()?,
            user_email: args.present_text("user_email"),
            position: args.integer("position")?,
            due_date: args.text("due_date"),
        };
        if update.is_empty() {
            return Err(ToolError::Validation(EMPTY_UPDATE.to_string()));
        }
        Ok(update)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub project_id: String,
    pub user_email: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub position: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Create(NewTask),
    List {
        project_id: String,
    },
    Get {
        task_id: String,
    },
    /// Every update flavour, including the single-field ones.
    Update {
        task_id: String,
        update: TaskUpdate,
    },
    Delete {
        task_id: String,
    },
    GetAttachments {
        task_id: String,
    },
}

impl TaskCommand {
    pub fn parse(args: &ToolArgs) -> Result<Self, ToolError> {
        let command = match args.action::<TaskAction>()? {
            TaskAction::Create => {
                let (title, project_id) =
                    args.required_pair("title", "project_id", Some("creating a task"))?;
                let status = match args.text("status") {
                    Some(raw) => parse_status(&raw)?,
                    None => TaskStatus::default(),
                };
                let priority = match args.text("priority") {
                    Some(raw) => parse_priority(&raw)?,
                    None => TaskPriority::default(),
                };
                Self::Create(NewTask {
                    title,
                    description: args.present_text("description").unwrap_or_default(),
                    project_id,
                    user_email: args.present_text("user_email").unwrap_or_default(),
                    status,
                    priority,
                    position: args.integer("position")?.unwrap_or(0),
                    due_date: args.text("due_date"),
                })
            }
            TaskAction::List => Self::List {
                project_id: args.required("project_id")?,
            },
            TaskAction::Get => Self::Get {
                task_id: args.required("task_id")?,
            },
            TaskAction::Update => Self::Update {
                task_id: args.required("task_id")?,
                update: TaskUpdate::from_args(args)?,
            },
            TaskAction::UpdateStatus => {
                let (task_id, status) = args.required_pair("task_id", "status", None)?;
                Self::Update {
                    task_id,
                    update: TaskUpdate::new().status(parse_status(&status)?),
                }
            }
            TaskAction::UpdatePriority => {
                let (task_id, priority) = args.required_pair("task_id", "priority", None)?;
                Self::Update {
                    task_id,
                    update: TaskUpdate::new().priority(parse_priority(&priority)?),
                }
            }
            TaskAction::UpdateAssignee => Self::Update {
                task_id: args.required("task_id")?,
                update: TaskUpdate::new()
                    .user_email(args.present_text("user_email").unwrap_or_default()),
            },
            TaskAction::Delete => Self::Delete {
                task_id: args.required("task_id")?,
            },
            TaskAction::GetAttachments => Self::GetAttachments {
                task_id: args.required("task_id")?,
            },
        };
        Ok(command)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Create(_) => "creating task",
            Self::List { .. } => "listing tasks",
            Self::Get { .. } => "getting task",
            Self::Update { .. } => "updating task",
            Self::Delete { .. } => "deleting task",
            Self::GetAttachments { .. } => "getting task attachments",
        }
    }
}

/// Tasks inside one project.
#[derive(Debug, Clone)]
pub struct TaskClient {
    api: ApiClient,
}

impl TaskClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The one place a task is modified. Returns the backend's echo of the task.
    pub async fn apply_update(
        &self,
        base_url: &str,
        operation: &'static str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<String, ToolError> {
        let path = format!("/task/{}/update", segment(&task_id));
        let body = serde_json::to_value(update)
            .map_err(|source| ToolError::Decode { resource: RESOURCE, source })?;
        let request = ApiClient::request(base_url, HttpMethod::Put, &path).json(body);
        self.api.call(operation, request).await
    }

    pub async fn run(&self, base_url: &str, command: TaskCommand) -> Result<String, ToolError> {
        let operation = command.operation();
        match command {
            TaskCommand::Create(new_task) => {
                let project_id = new_task.project_id.clone();
                let body = serde_json::to_value(&new_task)
                    .map_err(|source| ToolError::Decode { resource: RESOURCE, source })?;
                let request =
                    ApiClient::request(base_url, HttpMethod::Post, "/task/create").json(body);
                let task: Task = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(format!(
                    "Successfully created task '{}' (ID: {}) in project {}",
                    task.title, task.id, project_id
                ))
            }
            TaskCommand::List { project_id } => {
                let path = with_query("/task/list", "projectId", &project_id);
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let body = self.api.call_value(RESOURCE, operation, request).await?;
                let tasks = flatten_task_listing(body)
                    .map_err(|source| ToolError::Decode { resource: RESOURCE, source })?;
                Ok(render_tasks(&tasks))
            }
            TaskCommand::Get { task_id } => {
                let path = format!("/task/{}", segment(&task_id));
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let task: Task = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_task(&task))
            }
            TaskCommand::Update { task_id, update } => {
                let body = self.apply_update(base_url, operation, &task_id, &update).await?;
                let echoed: Value = serde_json::from_str(&body)
                    .map_err(|source| ToolError::Decode { resource: RESOURCE, source })?;
                let title = echoed
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or(&task_id);
                Ok(format!("Successfully updated task '{}' (ID: {})", title, task_id))
            }
            TaskCommand::Delete { task_id } => {
                self.apply_update(base_url, operation, &task_id, &TaskUpdate::soft_delete())
                    .await?;
                Ok(format!("Successfully deleted task (ID: {})", task_id))
            }
            TaskCommand::GetAttachments { task_id } => {
                let path = format!("/tasks/{}/attachments", segment(&task_id));
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let attachments: Option<Vec<Attachment>> =
                    self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_attachments(&attachments.unwrap_or_default()))
            }
        }
    }
}

fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found in this project".to_string();
    }
    let lines: Vec<String> = tasks
        .iter()
        .map(|task| {
            format!(
                "- {} {} {} (ID: {}) - Assigned to: {}",
                TaskStatus::glyph_for(task.status.as_deref()),
                TaskPriority::glyph_for(task.priority.as_deref()),
                task.title,
                task.id,
                task.assignee()
            )
        })
        .collect();
    format!("Found {} task(s) in project:\n{}", tasks.len(), lines.join("\n"))
}

fn render_task(task: &Task) -> String {
    format!(
        "Task Details:\nTitle: {}\nID: {}\nDescription: {}\nStatus: {}\nPriority: {}\n\
         Project ID: {}\nAssigned to: {}\nDue Date: {}\nPosition: {}\nCreated: {}",
        task.title,
        task.id,
        task.description.as_deref().unwrap_or("None"),
        task.status.as_deref().unwrap_or("Unknown"),
        task.priority.as_deref().unwrap_or("Unknown"),
        task.project_id.as_ref().map(|id| id.as_str()).unwrap_or("Unknown"),
        task.assignee(),
        task.due_date.as_deref().unwrap_or("Not set"),
        task.position
            .as_ref()
            .map_or_else(|| "0".to_string(), ToString::to_string),
        task.created_at.as_deref().unwrap_or("Unknown"),
    )
}

fn render_attachments(attachments: &[Attachment]) -> String {
    if attachments.is_empty() {
        return "No attachments found for this task".to_string();
    }
    let lines: Vec<String> = attachments
        .iter()
        .map(|attachment| {
            format!(
                "- {} (Type: {}{}) - Created: {}",
                attachment.name,
                attachment.kind_or_unknown(),
                attachment.size_suffix(),
                attachment.created_at.as_deref().unwrap_or("Unknown")
            )
        })
        .collect();
    format!(
        "Task attachments ({}):\n{}",
        attachments.len(),
        lines.join("\n")
    )
}

#[async_trait]
impl Tool for TaskClient {
    fn name(&self) -> &'static str {
        "task"
    }

    fn description(&self) -> &'static str {
        "Manage tasks inside a project: create, list, get, update, update_status, \
        update_assignee, update_priority, delete, get_attachments."
    }

    fn actions(&self) -> &'static [&'static str] {
        TaskAction::VARIANTS
    }

    async fn execute(&self, args: &ToolArgs) -> ToolOutcome {
        let result = match TaskCommand::parse(args) {
            Ok(command) => self.run(&self.api.base_url(args), command).await,
            Err(err) => Err(err),
        };
        result.into()
    }
}
