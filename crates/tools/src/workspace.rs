use async_trait::async_trait;
use models::{Workspace, WorkspaceMember};
use serde_json::{Map, Value, json};
use strum::VariantNames as _;
use strum_macros::{Display, EnumString, VariantNames};

use crate::{
    api::{ApiClient, segment},
    args::ToolArgs,
    error::ToolError,
    tool::{Tool, ToolOutcome},
    transport::HttpMethod,
};

const RESOURCE: &str = "workspace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum WorkspaceAction {
    Create,
    List,
    Get,
    Update,
    Delete,
    GetMembers,
    InviteMember,
    RemoveMember,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceCommand {
    Create {
        name: String,
        description: String,
    },
    List,
    Get {
        workspace_id: String,
    },
    Update {
        workspace_id: String,
        name: Option<String>,
        description: Option<String>,
    },
    Delete {
        workspace_id: String,
    },
    GetMembers {
        workspace_id: String,
    },
    InviteMember {
        workspace_id: String,
        user_email: String,
    },
    RemoveMember {
        workspace_id: String,
        user_email: String,
    },
}

impl WorkspaceCommand {
    pub fn parse(args: &ToolArgs) -> Result<Self, ToolError> {
        let command = match args.action::<WorkspaceAction>()? {
            WorkspaceAction::Create => Self::Create {
                name: args.required_for("name", "creating a workspace")?,
                description: args.present_text("description").unwrap_or_default(),
            },
            WorkspaceAction::List => Self::List,
            WorkspaceAction::Get => Self::Get {
                workspace_id: args.required("workspace_id")?,
            },
            WorkspaceAction::Update => {
                let workspace_id = args.required("workspace_id")?;
                let name = args.text("name");
                // An empty description is a real value: it clears the field.
                let description = args.present_text("description");
                if name.is_none() && description.is_none() {
                    return Err(ToolError::Validation(
                        "Either 'name' or 'description' must be provided".to_string(),
                    ));
                }
                Self::Update {
                    workspace_id,
                    name,
                    description,
                }
            }
            WorkspaceAction::Delete => Self::Delete {
                workspace_id: args.required("workspace_id")?,
            },
            WorkspaceAction::GetMembers => Self::GetMembers {
                workspace_id: args.required("workspace_id")?,
            },
            WorkspaceAction::InviteMember => {
                let (workspace_id, user_email) =
                    args.required_pair("workspace_id", "user_email", None)?;
                Self::InviteMember {
                    workspace_id,
                    user_email,
                }
            }
            WorkspaceAction::RemoveMember => {
                let (workspace_id, user_email) =
                    args.required_pair("workspace_id", "user_email", None)?;
                Self::RemoveMember {
                    workspace_id,
                    user_email,
                }
            }
        };
        Ok(command)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Create { .. } => "creating workspace",
            Self::List => "listing workspaces",
            Self::Get { .. } => "getting workspace",
            Self::Update { .. } => "updating workspace",
            Self::Delete { .. } => "deleting workspace",
            Self::GetMembers { .. } => "getting workspace members",
            Self::InviteMember { .. } => "inviting member",
            Self::RemoveMember { .. } => "removing member",
        }
    }
}

/// Workspaces and their membership.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    api: ApiClient,
}

impl WorkspaceClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn run(&self, base_url: &str, command: WorkspaceCommand) -> Result<String, ToolError> {
        let operation = command.operation();
        match command {
            WorkspaceCommand::Create { name, description } => {
                let request = ApiClient::request(base_url, HttpMethod::Post, "/workspace/create")
                    .json(json!({ "name": name, "description": description }));
                let workspace: Workspace = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(format!(
                    "Successfully created workspace '{}' (ID: {})",
                    workspace.name, workspace.id
                ))
            }
            WorkspaceCommand::List => {
                let request = ApiClient::request(base_url, HttpMethod::Get, "/workspace/list");
                let workspaces: Option<Vec<Workspace>> =
                    self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_workspaces(&workspaces.unwrap_or_default()))
            }
            WorkspaceCommand::Get { workspace_id } => {
                let path = format!("/workspace/{}", segment(&workspace_id));
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let workspace: Workspace = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_workspace(&workspace))
            }
            WorkspaceCommand::Update {
                workspace_id,
                name,
                description,
            } => {
                let mut body = Map::new();
                if let Some(name) = name {
                    body.insert("name".to_string(), Value::String(name));
                }
                if let Some(description) = description {
                    body.insert("description".to_string(), Value::String(description));
                }
                let path = format!("/workspace/{}", segment(&workspace_id));
                let request =
                    ApiClient::request(base_url, HttpMethod::Put, &path).json(Value::Object(body));
                let workspace: Workspace = self.api.call_json(RESOURCE, operation, request).await?;
                Ok(format!(
                    "Successfully updated workspace '{}' (ID: {})",
                    workspace.name, workspace.id
                ))
            }
            WorkspaceCommand::Delete { workspace_id } => {
                let path = format!("/workspace/{}", segment(&workspace_id));
                let request = ApiClient::request(base_url, HttpMethod::Delete, &path);
                self.api.call(operation, request).await?;
                Ok(format!("Successfully deleted workspace (ID: {})", workspace_id))
            }
            WorkspaceCommand::GetMembers { workspace_id } => {
                let path = format!("/workspace-user/list/{}", segment(&workspace_id));
                let request = ApiClient::request(base_url, HttpMethod::Get, &path);
                let members: Option<Vec<WorkspaceMember>> =
                    self.api.call_json(RESOURCE, operation, request).await?;
                Ok(render_members(&members.unwrap_or_default()))
            }
            WorkspaceCommand::InviteMember {
                workspace_id,
                user_email,
            } => {
                let path = format!("/workspace-user/{}/invite", segment(&workspace_id));
                let request = ApiClient::request(base_url, HttpMethod::Post, &path)
                    .json(json!({ "userEmail": user_email }));
                self.api.call(operation, request).await?;
                Ok(format!("Successfully invited {} to workspace", user_email))
            }
            WorkspaceCommand::RemoveMember {
                workspace_id,
                user_email,
            } => {
                let path = format!(
                    "/workspace-user/{}/user/{}",
                    segment(&workspace_id),
                    segment(&user_email)
                );
                let request = ApiClient::request(base_url, HttpMethod::Delete, &path);
                self.api.call(operation, request).await?;
                Ok(format!("Successfully removed {} from workspace", user_email))
            }
        }
    }
}

fn render_workspaces(workspaces: &[Workspace]) -> String {
    if workspaces.is_empty() {
        return "No workspaces found".to_string();
    }
    let lines: Vec<String> = workspaces
        .iter()
        .map(|ws| {
            format!(
                "- {} (ID: {}) - Owner: {}",
                ws.name,
                ws.id,
                ws.owner_email.as_deref().unwrap_or("Unknown")
            )
        })
        .collect();
    format!("Found {} workspace(s):\n{}", workspaces.len(), lines.join("\n"))
}

fn render_workspace(workspace: &Workspace) -> String {
    format!(
        "Workspace Details:\nName: {}\nID: {}\nDescription: {}\nOwner: {}\nCreated: {}",
        workspace.name,
        workspace.id,
        workspace.description.as_deref().unwrap_or("None"),
        workspace.owner_email.as_deref().unwrap_or("Unknown"),
        workspace.created_at.as_deref().unwrap_or("Unknown"),
    )
}

fn render_members(members: &[WorkspaceMember]) -> String {
    if members.is_empty() {
        return "No members found in this workspace".to_string();
    }
    let lines: Vec<String> = members
        .iter()
        .map(|member| {
            format!(
                "- {} ({}) - Role: {}",
                member.display_name(),
                member.user_email.as_deref().unwrap_or("Unknown"),
                member.role_or_default()
            )
        })
        .collect();
    format!("Workspace members ({}):\n{}", members.len(), lines.join("\n"))
}

#[async_trait]
impl Tool for WorkspaceClient {
    fn name(&self) -> &'static str {
        "workspace"
    }

    fn description(&self) -> &'static str {
        "Manage workspaces and their members: create, list, get, update, delete, \
        get_members, invite_member, remove_member."
    }

    fn actions(&self) -> &'static [&'static str] {
        WorkspaceAction::VARIANTS
    }

    async fn execute(&self, args: &ToolArgs) -> ToolOutcome {
        let result = match WorkspaceCommand::parse(args) {
            Ok(command) => self.run(&self.api.base_url(args), command).await,
            Err(err) => Err(err),
        };
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::testing::{StubTransport, api_for, args, url};

    fn client(stub: &Arc<StubTransport>) -> WorkspaceClient {
        WorkspaceClient::new(api_for(stub))
    }

    #[tokio::test]
    async fn create_posts_name_and_default_description() {
        let stub = StubTransport::new();
        stub.respond_json(json!({ "id": "ws-1", "name": "Core" }));

        let outcome = client(&stub)
            .execute(&args(json!({ "action": "create", "name": "Core" })))
            .await;

        assert!(!outcome.is_error);
        assert_eq!(outcome.message, "Successfully created workspace 'Core' (ID: ws-1)");
        let request = stub.only_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, url("/workspace/create"));
        assert_eq!(request.body, Some(json!({ "name": "Core", "description": "" })));
    }

    #[tokio::test]
    async fn create_without_name_sends_nothing() {
        let stub = StubTransport::new();
        let outcome = client(&stub)
            .execute(&args(json!({ "action": "create", "name": "" })))
            .await;
        assert!(outcome.is_error);
        assert_eq!(
            outcome.message,
            "Error: 'name' parameter is required for creating a workspace"
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn list_renders_owner_lines() {
        let stub = StubTransport::new();
        stub.respond_json(json!([
            { "id": 1, "name": "Core", "ownerEmail": "lead@example.com" },
            { "id": 2, "name": "Ops" }
        ]));

        let outcome = client(&stub).execute(&args(json!({ "action": "list" }))).await;

        assert_eq!(
            outcome.message,
            "Found 2 workspace(s):\n\
             - Core (ID: 1) - Owner: lead@example.com\n\
             - Ops (ID: 2) - Owner: Unknown"
        );
    }

    #[tokio::test]
    async fn empty_list_has_its_own_message() {
        let stub = StubTransport::new();
        stub.respond_json(json!([]));
        let outcome = client(&stub).execute(&args(json!({ "action": "list" }))).await;
        assert!(!outcome.is_error);
        assert_eq!(outcome.message, "No workspaces found");
    }

    #[tokio::test]
    async fn get_renders_details_with_fallbacks() {
        let stub = StubTransport::new();
        stub.respond_json(json!({ "id": "ws-9", "name": "Core", "createdAt": "2024-05-01" }));

        let outcome = client(&stub)
            .execute(&args(json!({ "action": "get", "workspace_id": "ws-9" })))
            .await;

        assert_eq!(
            outcome.message,
            "Workspace Details:\nName: Core\nID: ws-9\nDescription: None\nOwner: Unknown\nCreated: 2024-05-01"
        );
        assert_eq!(stub.only_request().url, url("/workspace/ws-9"));
    }

    #[tokio::test]
    async fn update_requires_a_field() {
        let stub = StubTransport::new();
        let outcome = client(&stub)
            .execute(&args(json!({ "action": "update", "workspace_id": "ws-1", "name": "" })))
            .await;
        assert_eq!(
            outcome.message,
            "Error: Either 'name' or 'description' must be provided"
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn update_accepts_empty_description() {
        let stub = StubTransport::new();
        stub.respond_json(json!({ "id": "ws-1", "name": "Core" }));

        let outcome = client(&stub)
            .execute(&args(json!({
                "action": "update",
                "workspace_id": "ws-1",
                "description": ""
            })))
            .await;

        assert_eq!(outcome.message, "Successfully updated workspace 'Core' (ID: ws-1)");
        let request = stub.only_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.body, Some(json!({ "description": "" })));
    }

    #[tokio::test]
    async fn delete_uses_delete_verb() {
        let stub = StubTransport::new();
        stub.respond_text(200, "");
        let outcome = client(&stub)
            .execute(&args(json!({ "action": "delete", "workspace_id": 5 })))
            .await;
        assert_eq!(outcome.message, "Successfully deleted workspace (ID: 5)");
        let request = stub.only_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, url("/workspace/5"));
    }

    #[tokio::test]
    async fn members_default_to_member_role() {
        let stub = StubTransport::new();
        stub.respond_json(json!([
            { "userName": "Ada", "userEmail": "ada@example.com", "role": "owner" },
            { "userName": "Lin", "userEmail": "lin@example.com" }
        ]));

        let outcome = client(&stub)
            .execute(&args(json!({ "action": "get_members", "workspace_id": "ws-1" })))
            .await;

        assert_eq!(
            outcome.message,
            "Workspace members (2):\n\
             - Ada (ada@example.com) - Role: owner\n\
             - Lin (lin@example.com) - Role: member"
        );
        assert_eq!(stub.only_request().url, url("/workspace-user/list/ws-1"));
    }

    #[tokio::test]
    async fn invite_and_remove_target_membership_paths() {
        let stub = StubTransport::new();
        stub.respond_json(json!({ "userEmail": "new@example.com" }));
        stub.respond_text(200, "");
        let client = client(&stub);

        let invited = client
            .execute(&args(json!({
                "action": "invite_member",
                "workspace_id": "ws-1",
                "user_email": "new@example.com"
            })))
            .await;
        let removed = client
            .execute(&args(json!({
                "action": "remove_member",
                "workspace_id": "ws-1",
                "user_email": "new@example.com"
            })))
            .await;

        assert_eq!(invited.message, "Successfully invited new@example.com to workspace");
        assert_eq!(removed.message, "Successfully removed new@example.com from workspace");

        let requests = stub.requests();
        assert_eq!(requests[0].url, url("/workspace-user/ws-1/invite"));
        assert_eq!(requests[0].body, Some(json!({ "userEmail": "new@example.com" })));
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert_eq!(requests[1].url, url("/workspace-user/ws-1/user/new@example.com"));
    }

    #[tokio::test]
    async fn members_without_a_name_still_render() {
        let stub = StubTransport::new();
        stub.respond_json(json!([
            { "userName": null, "userEmail": "guest@example.com", "role": "viewer" },
            { "userEmail": "quiet@example.com" },
            { "userName": "Ada", "userEmail": "ada@example.com" }
        ]));

        let outcome = client(&stub)
            .execute(&args(json!({ "action": "get_members", "workspace_id": "ws-1" })))
            .await;

        assert!(!outcome.is_error, "{}", outcome.message);
        assert_eq!(
            outcome.message,
            "Workspace members (3):\n\
             - guest@example.com (guest@example.com) - Role: viewer\n\
             - quiet@example.com (quiet@example.com) - Role: member\n\
             - Ada (ada@example.com) - Role: member"
        );
    }

    #[tokio::test]
    async fn membership_path_segments_are_escaped() {
        let stub = StubTransport::new();
        stub.respond_text(200, "");

        client(&stub)
            .execute(&args(json!({
                "action": "remove_member",
                "workspace_id": "ws/1",
                "user_email": "odd#name?@example.com"
            })))
            .await;

        assert_eq!(
            stub.only_request().url,
            url("/workspace-user/ws%2F1/user/odd%23name%3F@example.com")
        );
    }

    #[tokio::test]
    async fn membership_actions_need_email() {
        let stub = StubTransport::new();
        for action in ["invite_member", "remove_member"] {
            let outcome = client(&stub)
                .execute(&args(json!({ "action": action, "workspace_id": "ws-1" })))
                .await;
            assert_eq!(
                outcome.message,
                "Error: Both 'workspace_id' and 'user_email' parameters are required"
            );
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn read_actions_surface_remote_errors() {
        let reads = [
            (json!({ "action": "list" }), "listing workspaces"),
            (json!({ "action": "get", "workspace_id": "x" }), "getting workspace"),
            (
                json!({ "action": "get_members", "workspace_id": "x" }),
                "getting workspace members",
            ),
        ];
        for (call, operation) in reads {
            let stub = StubTransport::new();
            stub.respond_text(404, "not found");
            let outcome = client(&stub).execute(&args(call)).await;
            assert!(outcome.is_error);
            assert_eq!(outcome.message, format!("Error {operation}: 404 - not found"));
        }
    }

    #[tokio::test]
    async fn api_url_argument_redirects_the_call() {
        let stub = StubTransport::new();
        stub.respond_json(json!([]));
        client(&stub)
            .execute(&args(json!({ "action": "list", "api_url": "http://10.1.1.1:3000/" })))
            .await;
        assert_eq!(stub.only_request().url, "http://10.1.1.1:3000/workspace/list");
    }
}
