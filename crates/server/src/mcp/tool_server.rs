use std::sync::Arc;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::tool::ToolRouter,
    model::{
        CallToolResult, Content, Icon, Implementation, ProtocolVersion, ServerCapabilities,
        ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use tools::{ToolArgs, ToolOutcome, ToolRegistry};

use crate::mcp::params::{Parameters, TextOrNumber};

#[derive(Debug, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkspaceToolRequest {
    #[schemars(
        description = "One of: create, list, get, update, delete, get_members, invite_member, remove_member"
    )]
    pub action: Option<String>,
    #[schemars(description = "Workspace id (get, update, delete and member actions)")]
    pub workspace_id: Option<TextOrNumber>,
    #[schemars(description = "Workspace name (required for create)")]
    pub name: Option<String>,
    #[schemars(description = "Workspace description; an empty string clears it on update")]
    pub description: Option<String>,
    #[schemars(description = "Member email (invite_member, remove_member)")]
    pub user_email: Option<String>,
    #[schemars(description = "Override the backend base URL for this call")]
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ProjectToolRequest {
    #[schemars(description = "One of: create, list, get, update, delete")]
    pub action: Option<String>,
    #[schemars(description = "Project id (get, update, delete)")]
    pub project_id: Option<TextOrNumber>,
    #[schemars(description = "Owning workspace id (create, list, get, update)")]
    pub workspace_id: Option<TextOrNumber>,
    #[schemars(description = "Project name (required for create)")]
    pub name: Option<String>,
    #[schemars(description = "Project description; an empty string clears it on update")]
    pub description: Option<String>,
    #[schemars(description = "Icon shown next to the project, defaults to 📁")]
    pub icon: Option<String>,
    #[schemars(description = "URL slug, derived from the name when omitted on create")]
    pub slug: Option<String>,
    #[schemars(description = "Override the backend base URL for this call")]
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TaskToolRequest {
    #[schemars(
        description = "One of: create, list, get, update, update_status, update_assignee, update_priority, delete, get_attachments"
    )]
    pub action: Option<String>,
    #[schemars(description = "Task id (every action except create and list)")]
    pub task_id: Option<TextOrNumber>,
    #[schemars(description = "Project id (create, list)")]
    pub project_id: Option<TextOrNumber>,
    #[schemars(description = "Task title (required for create)")]
    pub title: Option<String>,
    #[schemars(description = "Task description; an empty string clears it on update")]
    pub description: Option<String>,
    #[schemars(description = "TODO, IN_PROGRESS or DONE")]
    pub status: Option<String>,
    #[schemars(description = "LOW, MEDIUM, HIGH or URGENT")]
    pub priority: Option<String>,
    #[schemars(description = "Assignee email; empty unassigns")]
    pub user_email: Option<String>,
    #[schemars(description = "Integer position within the column")]
    pub position: Option<TextOrNumber>,
    #[schemars(description = "Due date as accepted by the backend, e.g. 2025-01-31")]
    pub due_date: Option<String>,
    #[schemars(description = "Override the backend base URL for this call")]
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FileToolRequest {
    #[schemars(
        description = "One of: list, upload, attach_to_task, add_url_to_task, remove_task_attachment, get_task_attachments"
    )]
    pub action: Option<String>,
    #[schemars(description = "Task id (attachment actions)")]
    pub task_id: Option<TextOrNumber>,
    #[schemars(description = "File id from the file list (attach_to_task)")]
    pub file_id: Option<TextOrNumber>,
    #[schemars(description = "Attachment id (remove_task_attachment)")]
    pub attachment_id: Option<TextOrNumber>,
    #[schemars(description = "Link to attach (add_url_to_task)")]
    pub url: Option<String>,
    #[schemars(description = "Display name for the link, defaults to the URL")]
    pub name: Option<String>,
    #[schemars(description = "Local path (upload is not supported)")]
    pub file_path: Option<String>,
    #[schemars(description = "File name (upload is not supported)")]
    pub file_name: Option<String>,
    #[schemars(description = "Override the backend base URL for this call")]
    pub api_url: Option<String>,
}

/// MCP front for the tool registry. Each MCP tool maps onto one registry tool.
#[derive(Clone)]
pub struct BoardToolServer {
    registry: Arc<ToolRegistry>,
    tool_router: ToolRouter<BoardToolServer>,
}

impl BoardToolServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            tool_router: Self::tool_router(),
        }
    }

    /// Unset request fields serialize as null, which the tools treat as absent.
    fn to_args<T: Serialize>(request: &T) -> ToolArgs {
        serde_json::to_value(request)
            .map(ToolArgs::from)
            .unwrap_or_default()
    }

    fn into_result(outcome: ToolOutcome) -> CallToolResult {
        let content = vec![Content::text(outcome.message)];
        if outcome.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }

    async fn dispatch<T: Serialize>(
        &self,
        tool: &str,
        request: &T,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self.registry.invoke(tool, &Self::to_args(request)).await;
        Ok(Self::into_result(outcome))
    }
}

#[tool_router]
impl BoardToolServer {
    #[tool(
        description = r#"Use when: Creating, listing, inspecting, renaming or deleting workspaces, or managing workspace members.
Required: action; workspace_id for everything except create/list; name for create; user_email for member actions.
Next: project tool with the workspace_id."#
    )]
    async fn workspace(
        &self,
        Parameters(request): Parameters<WorkspaceToolRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch("workspace", &request).await
    }

    #[tool(
        description = r#"Use when: Managing projects inside a workspace.
Required: action; workspace_id for create/list/get/update; project_id for get/update/delete; name for create.
Next: task tool with the project_id."#
    )]
    async fn project(
        &self,
        Parameters(request): Parameters<ProjectToolRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch("project", &request).await
    }

    #[tool(
        description = r#"Use when: Managing tasks on a project board.
Required: action; project_id for create/list; task_id for everything else; title for create.
Avoid: DELETED as a status; use the delete action instead."#
    )]
    async fn task(
        &self,
        Parameters(request): Parameters<TaskToolRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch("task", &request).await
    }

    #[tool(
        description = r#"Use when: Listing files or managing a task's file and link attachments.
Required: action; task_id for attachment actions.
Avoid: upload, which is not supported here."#
    )]
    async fn file(
        &self,
        Parameters(request): Parameters<FileToolRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch("file", &request).await
    }
}

#[tool_handler]
impl ServerHandler for BoardToolServer {
    fn get_info(&self) -> ServerInfo {
        let instruction = "Project-board tools over a REST backend. Every tool takes an 'action' plus flat named parameters and answers with a human-readable message. TOOLS: 'workspace', 'project', 'task', 'file'. Discover ids with list actions: workspace list → project list (workspace_id) → task list (project_id). Task status is one of TODO, IN_PROGRESS, DONE; priority is one of LOW, MEDIUM, HIGH, URGENT. Failures come back as error results whose text starts with 'Error' or 'Network error'; invalid parameter errors include JSON-RPC error data with path/hint.".to_string();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "board-tools".to_string(),
                title: Some("Board Tools MCP Server".to_string()),
                description: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: Some(vec![Icon {
                    src: "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg'/>".to_string(),
                    mime_type: Some("image/svg+xml".to_string()),
                    sizes: Some(vec!["any".to_string()]),
                }]),
                website_url: None,
            },
            instructions: Some(instruction),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use rmcp::ServerHandler as _;
    use serde_json::json;
    use test_support::StubBackend;
    use tools::{ApiClient, ReqwestTransport, ToolHistory};

    use super::*;

    fn server_for(base_url: &str) -> BoardToolServer {
        let api = ApiClient::new(Arc::new(ReqwestTransport::new(Duration::from_secs(5))), base_url);
        BoardToolServer::new(ToolRegistry::with_backend_tools(api))
    }

    fn text(result: &CallToolResult) -> &str {
        result
            .content
            .first()
            .and_then(|content| content.as_text())
            .map(|text| text.text.as_str())
            .unwrap_or("")
    }

    #[test]
    fn router_exposes_one_tool_per_resource() {
        let server = server_for("http://example.com");
        for name in ["workspace", "project", "task", "file"] {
            assert!(server.tool_router.map.contains_key(name), "{name} missing");
        }
        assert_eq!(server.tool_router.map.len(), 4);

        let instructions = server.get_info().instructions.unwrap_or_default();
        assert!(instructions.contains("'workspace', 'project', 'task', 'file'"));
    }

    #[test]
    fn server_info_identifies_the_board_tools() {
        let info = server_for("http://example.com").get_info();
        assert_eq!(info.server_info.name, "board-tools");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.server_info.description, None);
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn task_schema_lists_flat_parameters() {
        let server = server_for("http://example.com");
        let tool = server.tool_router.map.get("task").expect("task tool");
        let schema = serde_json::Value::Object(tool.attr.input_schema.as_ref().clone());
        let properties = schema["properties"].as_object().expect("properties");
        for key in ["action", "task_id", "project_id", "status", "priority", "position", "api_url"] {
            assert!(properties.contains_key(key), "{key} missing from schema");
        }
    }

    #[test]
    fn unset_fields_become_absent_arguments() {
        let args = BoardToolServer::to_args(&TaskToolRequest {
            action: Some("get".to_string()),
            task_id: Some(TextOrNumber::Number(12)),
            ..TaskToolRequest::default()
        });
        assert_eq!(args.text("task_id").as_deref(), Some("12"));
        assert!(!args.is_present("title"));
    }

    #[tokio::test]
    async fn workspace_list_round_trips_through_backend() {
        let backend = StubBackend::start().await;
        backend.respond_json(
            "GET",
            "/workspace/list",
            json!([{ "id": "ws-1", "name": "Core", "ownerEmail": "lead@example.com" }]),
        );
        let server = server_for(&backend.base_url());

        let result = server
            .workspace(Parameters(WorkspaceToolRequest {
                action: Some("list".to_string()),
                ..WorkspaceToolRequest::default()
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text(&result),
            "Found 1 workspace(s):\n- Core (ID: ws-1) - Owner: lead@example.com"
        );
    }

    #[tokio::test]
    async fn failures_become_error_results() {
        let backend = StubBackend::start().await;
        let server = server_for(&backend.base_url());

        let missing = server
            .task(Parameters(TaskToolRequest {
                action: Some("get".to_string()),
                task_id: Some(TextOrNumber::Text("nope".to_string())),
                ..TaskToolRequest::default()
            }))
            .await
            .unwrap();
        assert_eq!(missing.is_error, Some(true));
        assert_eq!(text(&missing), "Error getting task: 404 - not found");

        let upload = server
            .file(Parameters(FileToolRequest {
                action: Some("upload".to_string()),
                ..FileToolRequest::default()
            }))
            .await
            .unwrap();
        assert_eq!(upload.is_error, Some(true));
        assert!(text(&upload).starts_with("File upload functionality requires multipart"));

        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn observers_registered_on_the_registry_see_mcp_calls() {
        let history = Arc::new(ToolHistory::default());
        let mut registry = ToolRegistry::with_backend_tools(ApiClient::new(
            Arc::new(ReqwestTransport::new(Duration::from_secs(1))),
            "http://example.com",
        ));
        registry.observe(history.clone());
        let server = BoardToolServer::new(registry);

        server
            .project(Parameters(ProjectToolRequest::default()))
            .await
            .unwrap();

        let entries = history.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tool, "project");
        assert_eq!(entries[0].message, "Error: 'action' parameter is required");
    }
}
